// src/endpoint/handler.rs
use crate::health::{CompositeHealthIndicator, Health, HealthIndicator};
use crate::info::{Info, InfoContributor};
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Method, Request, Response, StatusCode};
use std::sync::Arc;
use tower::Service;
use tracing::{debug, error};
use uuid::Uuid;

/// Routes `GET <health_path>` and `GET <info_path>` onto the composite
/// indicator and the registered info contributors.
///
/// The health response carries the aggregated document with the status
/// mapped onto the HTTP code: DOWN and OUT_OF_SERVICE answer 503,
/// everything else 200.
#[derive(Clone)]
pub struct ActuatorHandler {
    composite: Arc<CompositeHealthIndicator>,
    contributors: Arc<Vec<Box<dyn InfoContributor>>>,
    health_path: String,
    info_path: String,
}

impl ActuatorHandler {
    pub fn new(
        composite: Arc<CompositeHealthIndicator>,
        contributors: Arc<Vec<Box<dyn InfoContributor>>>,
    ) -> Self {
        Self {
            composite,
            contributors,
            health_path: "/health".to_string(),
            info_path: "/info".to_string(),
        }
    }

    pub fn with_paths(mut self, health_path: impl Into<String>, info_path: impl Into<String>) -> Self {
        self.health_path = health_path.into();
        self.info_path = info_path.into();
        self
    }

    async fn handle(self, req: Request<Body>) -> Response<Body> {
        let request_id = Uuid::new_v4();
        let path = req.uri().path().to_string();
        debug!(%request_id, method = %req.method(), %path, "actuator request");

        if req.method() != Method::GET {
            return plain_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        }

        if path == self.health_path {
            let health = self.composite.health().await;
            return health_response(&health);
        }

        if path == self.info_path {
            return match self.build_info() {
                Ok(info) => json_response(StatusCode::OK, &info),
                Err(err) => {
                    error!(%request_id, error = %format!("{err:#}"), "info contributor failed");
                    plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                }
            };
        }

        plain_response(StatusCode::NOT_FOUND, "Not Found")
    }

    fn build_info(&self) -> anyhow::Result<Info> {
        let mut builder = Info::builder();
        for contributor in self.contributors.iter() {
            builder = contributor.contribute(builder)?;
        }
        Ok(builder.build())
    }
}

fn health_response(health: &Health) -> Response<Body> {
    let code = match health.status().code() {
        "DOWN" | "OUT_OF_SERVICE" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    json_response(code, health)
}

fn json_response<T: serde::Serialize>(code: StatusCode, value: &T) -> Response<Body> {
    let body = serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec());
    Response::builder()
        .status(code)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn plain_response(code: StatusCode, message: &'static str) -> Response<Body> {
    Response::builder()
        .status(code)
        .body(Body::from(message))
        .unwrap()
}

impl Service<Request<Body>> for ActuatorHandler {
    type Response = Response<Body>;
    type Error = Box<dyn std::error::Error + Send + Sync>;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        Box::pin(async move { Ok(handler.handle(req).await) })
    }
}
