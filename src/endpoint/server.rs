// src/endpoint/server.rs
use crate::endpoint::ActuatorHandler;
use anyhow::{Context, Result};
use hyper::server::conn::Http;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Serves the actuator endpoints: bind the socket, accept, one hyper
/// task per connection.
pub struct ActuatorServer {
    addr: SocketAddr,
    handler: Option<ActuatorHandler>,
}

impl ActuatorServer {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            handler: None,
        }
    }

    pub fn with_handler(mut self, handler: ActuatorHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Consume the builder, bind the TCP listener, serve forever.
    pub async fn serve(self) -> Result<()> {
        let handler = self
            .handler
            .context("handler must be set via with_handler()")?;

        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("failed to bind {}", self.addr))?;
        tracing::info!("actuator endpoints listening on {}", self.addr);

        loop {
            let (stream, peer) = listener.accept().await?;
            let svc = handler.clone();

            tokio::spawn(async move {
                if let Err(err) = Http::new().serve_connection(stream, svc).await {
                    tracing::warn!(%peer, %err, "connection error");
                }
            });
        }
    }
}
