// src/indicators/postgres.rs
use crate::health::{HealthBuilder, HealthProbe};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use url::Url;

/// Probes a PostgreSQL server: connect, read the server version, close.
/// The connection is closed explicitly on success and dropped (which
/// closes the socket) when the probe bails early.
pub struct PostgresProbe {
    url: Url,
}

impl PostgresProbe {
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

#[async_trait]
impl HealthProbe for PostgresProbe {
    async fn check(&self, builder: HealthBuilder) -> Result<HealthBuilder> {
        let mut conn = PgConnection::connect(self.url.as_str())
            .await
            .context("failed to connect to PostgreSQL")?;
        let version: String = sqlx::query_scalar("SHOW server_version")
            .fetch_one(&mut conn)
            .await
            .context("failed to read server version")?;
        conn.close()
            .await
            .context("failed to close PostgreSQL connection")?;

        Ok(builder
            .up()
            .with_detail("host", self.url.host_str().unwrap_or("localhost"))?
            .with_detail("port", self.url.port().unwrap_or(5432))?
            .with_detail("version", version)?)
    }
}
