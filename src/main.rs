// src/main.rs
use anyhow::Result;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use rust_actuator::config::{self, IndicatorConfig};
use rust_actuator::endpoint::{ActuatorHandler, ActuatorServer};
use rust_actuator::health::{
    CompositeHealthIndicator, HealthIndicator, OrderedHealthAggregator, ProbeHealthIndicator,
};
use rust_actuator::indicators::{HttpProbe, TcpProbe};
use rust_actuator::info::{BuildInfoContributor, InfoContributor, MapInfoContributor};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rust_actuator=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;

    // Wire the aggregator, applying any configured priority override
    let mut aggregator = OrderedHealthAggregator::new();
    if let Some(order) = config.health.status_order.clone() {
        aggregator.set_status_code_order(order);
    }

    // Build the composite over the configured indicators
    let mut composite = CompositeHealthIndicator::new("application", Arc::new(aggregator));
    for indicator_config in &config.health.indicators {
        let indicator = build_indicator(indicator_config)?;
        composite.add_indicator(indicator_config.name(), indicator)?;
    }
    info!(
        "Registered {} health indicator(s)",
        composite.indicator_count()
    );

    // Standard info contributors plus config-supplied static info
    let mut contributors: Vec<Box<dyn InfoContributor>> =
        vec![Box::new(BuildInfoContributor::new().started_at(Utc::now()))];
    if !config.info.is_empty() {
        contributors.push(Box::new(MapInfoContributor::new(config.info.clone())));
    }

    let handler = ActuatorHandler::new(Arc::new(composite), Arc::new(contributors)).with_paths(
        config.endpoints.health_path.clone(),
        config.endpoints.info_path.clone(),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Starting actuator endpoints on {}", addr);

    ActuatorServer::new(addr).with_handler(handler).serve().await?;

    Ok(())
}

fn build_indicator(config: &IndicatorConfig) -> Result<Arc<dyn HealthIndicator>> {
    match config {
        IndicatorConfig::Http {
            name,
            url,
            timeout_secs,
        } => {
            let probe = HttpProbe::new(url.clone(), Duration::from_secs(*timeout_secs))?;
            Ok(Arc::new(ProbeHealthIndicator::new(name.clone(), probe)))
        }
        IndicatorConfig::Tcp {
            name,
            addr,
            timeout_secs,
        } => {
            let probe = TcpProbe::new(addr.clone(), Duration::from_secs(*timeout_secs));
            Ok(Arc::new(ProbeHealthIndicator::new(name.clone(), probe)))
        }
        #[cfg(feature = "postgres")]
        IndicatorConfig::Postgres { name, url } => {
            let probe = rust_actuator::indicators::PostgresProbe::new(url.clone());
            Ok(Arc::new(ProbeHealthIndicator::new(name.clone(), probe)))
        }
        #[cfg(not(feature = "postgres"))]
        IndicatorConfig::Postgres { name, .. } => {
            anyhow::bail!("indicator '{name}' requires building with the 'postgres' feature")
        }
    }
}
