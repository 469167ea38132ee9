// src/indicators/http.rs
use crate::health::{HealthBuilder, HealthProbe};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

/// Probes an HTTP dependency by issuing a GET against its health URL.
/// Any non-2xx response or transport error fails the probe and becomes
/// DOWN through the indicator wrapper.
pub struct HttpProbe {
    url: Url,
    client: Client,
}

impl HttpProbe {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn check(&self, builder: HealthBuilder) -> Result<HealthBuilder> {
        let start = Instant::now();
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", self.url))?;
        let response_time_ms = start.elapsed().as_millis() as u64;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {status}");
        }

        Ok(builder
            .up()
            .with_detail("url", self.url.as_str())?
            .with_detail("http_status", status.as_u16())?
            .with_detail("response_time_ms", response_time_ms)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{HealthIndicator, ProbeHealthIndicator, Status};

    async fn probe(url: &str) -> crate::health::Health {
        let url = Url::parse(url).unwrap();
        let probe = HttpProbe::new(url, Duration::from_secs(2)).unwrap();
        ProbeHealthIndicator::new("backend", probe).health().await
    }

    #[tokio::test]
    async fn reports_up_on_success_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(200)
            .create_async()
            .await;

        let health = probe(&format!("{}/health", server.url())).await;
        assert_eq!(health.status(), &Status::up());
        assert_eq!(health.details()["http_status"], 200);
        assert!(health.details()["response_time_ms"].is_u64());
    }

    #[tokio::test]
    async fn reports_down_on_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(503)
            .create_async()
            .await;

        let health = probe(&format!("{}/health", server.url())).await;
        assert_eq!(health.status(), &Status::down());
        assert!(health.details()["error"]
            .as_str()
            .unwrap()
            .contains("503"));
    }

    #[tokio::test]
    async fn reports_down_when_unreachable() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let health = probe(&format!("http://{addr}/health")).await;
        assert_eq!(health.status(), &Status::down());
        assert!(!health.details()["error"].as_str().unwrap().is_empty());
    }
}
