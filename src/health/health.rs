// src/health/health.rs
use crate::health::Status;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Errors raised by the health and info builders. These indicate wiring
/// mistakes and are never swallowed by the indicator machinery.
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("detail key '{0}' is already present")]
    DuplicateDetailKey(String),

    #[error("detail '{0}' has a null value")]
    NullDetailValue(String),
}

/// Health of a component or subsystem: a [`Status`] plus contextual
/// details, built through [`HealthBuilder`].
///
/// ```
/// use rust_actuator::health::Health;
///
/// let health = Health::builder()
///     .up()
///     .with_detail("version", "9.6.2").unwrap()
///     .build();
/// assert_eq!(health.status().code(), "UP");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    pub(crate) status: Status,
    pub(crate) details: BTreeMap<String, Value>,
}

impl Health {
    /// Start a fresh builder: status UNKNOWN, no details.
    pub fn builder() -> HealthBuilder {
        HealthBuilder::new()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn details(&self) -> &BTreeMap<String, Value> {
        &self.details
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.status, self.details)
    }
}

// Flattened JSON shape: the status code sits at the top level with the
// details merged alongside it, e.g. {"status":"UP","version":"9.6.2"}.
impl Serialize for Health {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let described = !self.status.description().is_empty();
        let len = 1 + usize::from(described) + self.details.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("status", self.status.code())?;
        if described {
            map.serialize_entry("description", self.status.description())?;
        }
        for (key, value) in &self.details {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Mutable accumulator for [`Health`] values. Status-setting methods
/// chain freely; `with_detail` fails fast on duplicate keys (the detail
/// map is a dictionary-add, not an upsert).
#[derive(Debug)]
pub struct HealthBuilder {
    status: Status,
    details: BTreeMap<String, Value>,
}

impl HealthBuilder {
    pub fn new() -> Self {
        Self {
            status: Status::unknown(),
            details: BTreeMap::new(),
        }
    }

    /// Set status to UNKNOWN.
    pub fn unknown(self) -> Self {
        self.status(Status::unknown())
    }

    /// Set status to UP.
    pub fn up(self) -> Self {
        self.status(Status::up())
    }

    /// Set status to DOWN.
    pub fn down(self) -> Self {
        self.status(Status::down())
    }

    /// Set status to OUT_OF_SERVICE.
    pub fn out_of_service(self) -> Self {
        self.status(Status::out_of_service())
    }

    /// Set status to the given [`Status`].
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set status to an arbitrary code.
    pub fn status_code(self, code: impl Into<String>) -> Self {
        self.status(Status::new(code))
    }

    /// Record one detail. Fails if the key is already present or the
    /// value is null.
    pub fn with_detail(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, BuilderError> {
        let key = key.into();
        let value = value.into();
        if value.is_null() {
            return Err(BuilderError::NullDetailValue(key));
        }
        if self.details.contains_key(&key) {
            return Err(BuilderError::DuplicateDetailKey(key));
        }
        self.details.insert(key, value);
        Ok(self)
    }

    /// Record the given error chain under the `"error"` detail. Does not
    /// change the status; use [`down_with`](Self::down_with) for that.
    pub fn with_error(self, err: &anyhow::Error) -> Result<Self, BuilderError> {
        self.with_detail("error", format!("{err:#}"))
    }

    /// Set status to DOWN and record the error chain under `"error"`,
    /// replacing any partial `"error"` detail so this path cannot fail.
    pub fn down_with(mut self, err: &anyhow::Error) -> Self {
        self.details
            .insert("error".to_string(), Value::from(format!("{err:#}")));
        self.down()
    }

    /// Produce the immutable [`Health`].
    pub fn build(self) -> Health {
        Health {
            status: self.status,
            details: self.details,
        }
    }
}

impl Default for HealthBuilder {
    fn default() -> Self {
        Self::new()
    }
}
