// src/indicators/tcp.rs
use crate::health::{HealthBuilder, HealthProbe};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Probes a TCP dependency by opening a connection to `host:port`. The
/// stream is dropped as soon as the probe returns, success or failure.
pub struct TcpProbe {
    addr: String,
    connect_timeout: Duration,
}

impl TcpProbe {
    pub fn new(addr: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout,
        }
    }
}

#[async_trait]
impl HealthProbe for TcpProbe {
    async fn check(&self, builder: HealthBuilder) -> Result<HealthBuilder> {
        let start = Instant::now();
        let stream = timeout(self.connect_timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| anyhow!("connect to {} timed out after {:?}", self.addr, self.connect_timeout))?
            .with_context(|| format!("connect to {} failed", self.addr))?;
        let connect_time_ms = start.elapsed().as_millis() as u64;
        drop(stream);

        Ok(builder
            .up()
            .with_detail("addr", self.addr.as_str())?
            .with_detail("connect_time_ms", connect_time_ms)?)
    }
}
