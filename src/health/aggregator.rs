// src/health/aggregator.rs
use crate::health::{Health, Status};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reduces many named [`Health`] results into one. Implementations must
/// be pure: deterministic over the input set, no input mutation, and
/// total for any well-formed input.
pub trait HealthAggregator: Send + Sync {
    fn aggregate(&self, healths: &BTreeMap<String, Health>) -> Health;
}

/// Aggregator that determines the overall status from a configurable
/// ordered list of status codes, most significant first.
///
/// Candidates whose code is not in the configured order are ignored when
/// picking the winning status, but their full health still appears in
/// the merged details. An empty or all-unrecognized candidate set
/// degrades to UNKNOWN.
pub struct OrderedHealthAggregator {
    status_order: Vec<String>,
}

impl OrderedHealthAggregator {
    /// Default order: DOWN, OUT_OF_SERVICE, UP, UNKNOWN.
    pub fn new() -> Self {
        Self {
            status_order: vec![
                Status::down(),
                Status::out_of_service(),
                Status::up(),
                Status::unknown(),
            ]
            .into_iter()
            .map(|status| status.code().to_string())
            .collect(),
        }
    }

    /// Replace the status ordering. The previous order is discarded, not
    /// merged. Not safe to call concurrently with an in-flight
    /// aggregation; `&mut self` confines it to a setup phase.
    pub fn set_status_order(&mut self, statuses: Vec<Status>) {
        self.set_status_code_order(
            statuses
                .into_iter()
                .map(|status| status.code().to_string())
                .collect(),
        );
    }

    /// Replace the status ordering using bare codes.
    pub fn set_status_code_order(&mut self, codes: Vec<String>) {
        self.status_order = codes;
    }

    // Lowest index in the configured order wins. `min_by_key` keeps the
    // first minimum, so equal-status ties resolve to the first candidate
    // in iteration order (lexicographic by indicator name).
    fn aggregate_status<'a, I>(&self, candidates: I) -> Status
    where
        I: Iterator<Item = &'a Status>,
    {
        candidates
            .filter_map(|status| {
                self.status_order
                    .iter()
                    .position(|code| code == status.code())
                    .map(|index| (index, status))
            })
            .min_by_key(|(index, _)| *index)
            .map(|(_, status)| status.clone())
            .unwrap_or_else(Status::unknown)
    }

    // Every input keeps its entry, whether or not its status ranked.
    fn aggregate_details(healths: &BTreeMap<String, Health>) -> BTreeMap<String, Value> {
        healths
            .iter()
            .map(|(name, health)| {
                let value = serde_json::to_value(health).unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect()
    }
}

impl HealthAggregator for OrderedHealthAggregator {
    fn aggregate(&self, healths: &BTreeMap<String, Health>) -> Health {
        let status = self.aggregate_status(healths.values().map(Health::status));
        let details = Self::aggregate_details(healths);
        Health { status, details }
    }
}

impl Default for OrderedHealthAggregator {
    fn default() -> Self {
        Self::new()
    }
}
