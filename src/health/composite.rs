// src/health/composite.rs
use crate::health::{Health, HealthAggregator, HealthIndicator};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CompositeError {
    #[error("health indicator already registered under name '{0}'")]
    DuplicateIndicator(String),
}

/// Indicator whose own health is derived from a set of named child
/// indicators, reduced through a shared [`HealthAggregator`].
///
/// Children are probed live on every `health()` call, sequentially and
/// in lexicographic name order; there is no caching. Probing takes
/// `&self` and touches no interior state, so concurrent `health()`
/// calls are safe. Registration takes `&mut self` and belongs to the
/// wiring phase.
pub struct CompositeHealthIndicator {
    name: String,
    aggregator: Arc<dyn HealthAggregator>,
    indicators: BTreeMap<String, Arc<dyn HealthIndicator>>,
}

impl CompositeHealthIndicator {
    pub fn new(name: impl Into<String>, aggregator: Arc<dyn HealthAggregator>) -> Self {
        Self {
            name: name.into(),
            aggregator,
            indicators: BTreeMap::new(),
        }
    }

    /// Create a composite over an existing set of named indicators.
    pub fn with_indicators(
        name: impl Into<String>,
        aggregator: Arc<dyn HealthAggregator>,
        indicators: BTreeMap<String, Arc<dyn HealthIndicator>>,
    ) -> Self {
        Self {
            name: name.into(),
            aggregator,
            indicators,
        }
    }

    /// Register one indicator under a unique name. A duplicate name is a
    /// wiring mistake and fails fast.
    pub fn add_indicator(
        &mut self,
        name: impl Into<String>,
        indicator: Arc<dyn HealthIndicator>,
    ) -> Result<(), CompositeError> {
        let name = name.into();
        if self.indicators.contains_key(&name) {
            return Err(CompositeError::DuplicateIndicator(name));
        }
        self.indicators.insert(name, indicator);
        Ok(())
    }

    pub fn indicator_count(&self) -> usize {
        self.indicators.len()
    }
}

#[async_trait]
impl HealthIndicator for CompositeHealthIndicator {
    async fn health(&self) -> Health {
        let mut healths = BTreeMap::new();
        for (name, indicator) in &self.indicators {
            let health = indicator.health().await;
            debug!(indicator = %name, status = %health.status(), "probed indicator");
            healths.insert(name.clone(), health);
        }
        self.aggregator.aggregate(&healths)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
