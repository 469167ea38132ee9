// src/config/models.rs
use anyhow::{bail, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct ActuatorConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub health: HealthConfig,

    /// Static key/value pairs surfaced verbatim on the info endpoint.
    #[serde(default)]
    pub info: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_health_path")]
    pub health_path: String,

    #[serde(default = "default_info_path")]
    pub info_path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthConfig {
    /// Overrides the aggregator's status priority order, most
    /// significant code first. Replaces the default entirely.
    pub status_order: Option<Vec<String>>,

    #[serde(default)]
    pub indicators: Vec<IndicatorConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorConfig {
    Http {
        name: String,
        url: Url,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    Tcp {
        name: String,
        addr: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    Postgres {
        name: String,
        url: Url,
    },
}

impl IndicatorConfig {
    pub fn name(&self) -> &str {
        match self {
            Self::Http { name, .. } | Self::Tcp { name, .. } | Self::Postgres { name, .. } => name,
        }
    }
}

impl ActuatorConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(order) = self.status_order() {
            if order.is_empty() {
                bail!("health.status_order must not be empty when set");
            }
        }

        let mut seen = HashSet::new();
        for indicator in &self.health.indicators {
            let name = indicator.name();
            if name.is_empty() {
                bail!("indicator names must not be empty");
            }
            if !seen.insert(name) {
                bail!("duplicate indicator name '{name}'");
            }
        }

        if !self.endpoints.health_path.starts_with('/')
            || !self.endpoints.info_path.starts_with('/')
        {
            bail!("endpoint paths must start with '/'");
        }

        Ok(())
    }

    fn status_order(&self) -> Option<&Vec<String>> {
        self.health.status_order.as_ref()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            health_path: default_health_path(),
            info_path: default_info_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_info_path() -> String {
    "/info".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}
