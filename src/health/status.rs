// src/health/status.rs
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// State of a component or subsystem, identified by a short code.
///
/// Equality and hashing consider only the code, so two statuses with the
/// same code are interchangeable regardless of description.
#[derive(Debug, Clone)]
pub struct Status {
    code: String,
    description: String,
}

impl Status {
    /// Create a status with the given code and an empty description.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: String::new(),
        }
    }

    /// Create a status with the given code and description.
    pub fn with_description(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    /// The component or subsystem is in an unknown state.
    pub fn unknown() -> Self {
        Self::new("UNKNOWN")
    }

    /// The component or subsystem is functioning as expected.
    pub fn up() -> Self {
        Self::new("UP")
    }

    /// The component or subsystem has suffered an unexpected failure.
    pub fn down() -> Self {
        Self::new("DOWN")
    }

    /// The component or subsystem has been taken out of service and
    /// should not be used.
    pub fn out_of_service() -> Self {
        Self::new("OUT_OF_SERVICE")
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Status {}

impl Hash for Status {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

// Serialized as the bare code; the description is surfaced by the
// flattened `Health` serialization instead.
impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}
