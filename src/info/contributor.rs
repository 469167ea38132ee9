// src/info/contributor.rs
use crate::info::InfoBuilder;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

/// Contributes additional details to a shared [`InfoBuilder`]. A
/// duplicate-key collision between contributors is a wiring mistake and
/// propagates to the caller.
pub trait InfoContributor: Send + Sync {
    fn contribute(&self, builder: InfoBuilder) -> Result<InfoBuilder>;
}

/// Contributes a fixed key/value map.
pub struct MapInfoContributor {
    info: BTreeMap<String, Value>,
}

impl MapInfoContributor {
    pub fn new(info: BTreeMap<String, Value>) -> Self {
        Self { info }
    }
}

impl InfoContributor for MapInfoContributor {
    fn contribute(&self, builder: InfoBuilder) -> Result<InfoBuilder> {
        Ok(builder.with_details(self.info.clone())?)
    }
}

/// Contributes a single prefixed detail. A null detail contributes
/// nothing.
pub struct SimpleInfoContributor {
    prefix: String,
    detail: Value,
}

impl SimpleInfoContributor {
    pub fn new(prefix: impl Into<String>, detail: impl Into<Value>) -> Self {
        Self {
            prefix: prefix.into(),
            detail: detail.into(),
        }
    }
}

impl InfoContributor for SimpleInfoContributor {
    fn contribute(&self, builder: InfoBuilder) -> Result<InfoBuilder> {
        if self.detail.is_null() {
            return Ok(builder);
        }
        Ok(builder.with_detail(self.prefix.clone(), self.detail.clone())?)
    }
}

/// Contributes build metadata under `"build"` and, when constructed with
/// a start time, the process start under `"started_at"`.
pub struct BuildInfoContributor {
    name: &'static str,
    version: &'static str,
    started_at: Option<DateTime<Utc>>,
}

impl BuildInfoContributor {
    pub fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            started_at: None,
        }
    }

    pub fn started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }
}

impl Default for BuildInfoContributor {
    fn default() -> Self {
        Self::new()
    }
}

impl InfoContributor for BuildInfoContributor {
    fn contribute(&self, builder: InfoBuilder) -> Result<InfoBuilder> {
        let mut builder = builder.with_detail(
            "build",
            serde_json::json!({
                "name": self.name,
                "version": self.version,
            }),
        )?;
        if let Some(started_at) = self.started_at {
            builder = builder.with_detail("started_at", started_at.to_rfc3339())?;
        }
        Ok(builder)
    }
}
