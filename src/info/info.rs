// src/info/info.rs
use crate::health::BuilderError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form application metadata document, independent of health
/// status. Built through [`InfoBuilder`] and serialized as a flat
/// key/value object.
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    details: BTreeMap<String, Value>,
}

impl Info {
    pub fn builder() -> InfoBuilder {
        InfoBuilder::new()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    pub fn details(&self) -> &BTreeMap<String, Value> {
        &self.details
    }
}

impl Serialize for Info {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.details.len()))?;
        for (key, value) in &self.details {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Accumulator handed to each [`InfoContributor`](crate::info::InfoContributor)
/// in turn. Same detail policy as the health builder: duplicate keys and
/// null values are configuration errors.
#[derive(Debug, Default)]
pub struct InfoBuilder {
    content: BTreeMap<String, Value>,
}

impl InfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one detail. Fails on a duplicate key or null value.
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
        if self.content.contains_key(&key) {
            return Err(BuilderError::DuplicateDetailKey(key));
        }
        self.content.insert(key, value);
        Ok(self)
    }

    /// Record several details, failing on the first collision.
    pub fn with_details(
        mut self,
        details: BTreeMap<String, Value>,
    ) -> Result<Self, BuilderError> {
        for (key, value) in details {
            self = self.with_detail(key, value)?;
        }
        Ok(self)
    }

    pub fn build(self) -> Info {
        Info {
            details: self.content,
        }
    }
}
