// src/health/indicator.rs
use crate::health::{Health, HealthBuilder};
use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

/// Anything that can report an indication of health under a stable name.
///
/// `health()` is total: implementations convert dependency failures into
/// a DOWN result instead of surfacing them to the caller.
#[async_trait]
pub trait HealthIndicator: Send + Sync {
    /// Return an indication of health.
    async fn health(&self) -> Health;

    /// Stable identifier used as the aggregation key.
    fn name(&self) -> &str;
}

/// The actual dependency check behind an indicator. A probe receives a
/// fresh builder, performs the check (open a connection, read a version
/// string, release the handle on every path), and returns the builder
/// marked `up()` with its diagnostic details. Any error bubbles with `?`
/// and is converted to DOWN by [`ProbeHealthIndicator`].
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self, builder: HealthBuilder) -> Result<HealthBuilder>;
}

/// Adapter turning a plain closure into a probe, for simple checks that
/// need no client state of their own.
pub struct FnProbe<F>(F);

#[async_trait]
impl<F> HealthProbe for FnProbe<F>
where
    F: Fn(HealthBuilder) -> Result<HealthBuilder> + Send + Sync,
{
    async fn check(&self, builder: HealthBuilder) -> Result<HealthBuilder> {
        (self.0)(builder)
    }
}

/// Wraps a [`HealthProbe`] into a [`HealthIndicator`], capturing probe
/// failures so every concrete check does not repeat the same
/// error-to-DOWN conversion.
pub struct ProbeHealthIndicator<P> {
    name: String,
    probe: P,
}

impl<P: HealthProbe> ProbeHealthIndicator<P> {
    pub fn new(name: impl Into<String>, probe: P) -> Self {
        Self {
            name: name.into(),
            probe,
        }
    }
}

impl<F> ProbeHealthIndicator<FnProbe<F>>
where
    F: Fn(HealthBuilder) -> Result<HealthBuilder> + Send + Sync,
{
    /// Shorthand for wrapping a closure probe.
    pub fn from_fn(name: impl Into<String>, probe: F) -> Self {
        Self::new(name, FnProbe(probe))
    }
}

#[async_trait]
impl<P: HealthProbe> HealthIndicator for ProbeHealthIndicator<P> {
    async fn health(&self) -> Health {
        match self.probe.check(Health::builder()).await {
            Ok(builder) => builder.build(),
            Err(err) => {
                warn!(indicator = %self.name, error = %format!("{err:#}"), "health probe failed");
                Health::builder().down_with(&err).build()
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Status;
    use anyhow::bail;

    #[tokio::test]
    async fn successful_probe_passes_status_and_details_through() {
        let indicator = ProbeHealthIndicator::from_fn(
            "cache",
            |builder: HealthBuilder| -> Result<HealthBuilder> {
                Ok(builder.up().with_detail("server_status", "ok")?)
            },
        );

        let health = indicator.health().await;
        assert_eq!(health.status(), &Status::up());
        assert_eq!(health.details()["server_status"], "ok");
        assert_eq!(indicator.name(), "cache");
    }

    #[tokio::test]
    async fn failing_probe_becomes_down_with_error_detail() {
        let indicator = ProbeHealthIndicator::from_fn(
            "db",
            |_builder: HealthBuilder| -> Result<HealthBuilder> { bail!("connection refused") },
        );

        let health = indicator.health().await;
        assert_eq!(health.status(), &Status::down());
        let error = health.details()["error"].as_str().unwrap();
        assert!(!error.is_empty());
        assert!(error.contains("connection refused"));
    }

    #[tokio::test]
    async fn probe_builder_error_also_becomes_down() {
        // A duplicate detail key inside the probe is still captured.
        let indicator = ProbeHealthIndicator::from_fn(
            "dup",
            |builder: HealthBuilder| -> Result<HealthBuilder> {
                Ok(builder.up().with_detail("k", 1)?.with_detail("k", 2)?)
            },
        );

        let health = indicator.health().await;
        assert_eq!(health.status(), &Status::down());
        assert!(health.details()["error"]
            .as_str()
            .unwrap()
            .contains("already present"));
    }
}
