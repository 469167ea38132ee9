// tests/actuator_tests.rs
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use hyper::{Body, Method, Request, StatusCode};
use tower::Service;
use url::Url;

use rust_actuator::endpoint::ActuatorHandler;
use rust_actuator::health::{
    CompositeHealthIndicator, HealthIndicator, OrderedHealthAggregator, ProbeHealthIndicator,
    Status,
};
use rust_actuator::indicators::{HttpProbe, TcpProbe};
use rust_actuator::info::{InfoContributor, MapInfoContributor, SimpleInfoContributor};

async fn get(handler: &ActuatorHandler, path: &str) -> (StatusCode, serde_json::Value) {
    let mut service = handler.clone();
    let req = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    let response = service.call(req).await.unwrap();
    let code = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (code, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn aggregates_live_probes_into_one_document() {
    // A healthy HTTP dependency...
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/health")
        .with_status(200)
        .create_async()
        .await;
    let backend_url = Url::parse(&format!("{}/health", server.url())).unwrap();

    // ...and a TCP dependency whose port is closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed_addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let mut composite =
        CompositeHealthIndicator::new("application", Arc::new(OrderedHealthAggregator::new()));
    composite
        .add_indicator(
            "backend",
            Arc::new(ProbeHealthIndicator::new(
                "backend",
                HttpProbe::new(backend_url, Duration::from_secs(2)).unwrap(),
            )),
        )
        .unwrap();
    composite
        .add_indicator(
            "cache",
            Arc::new(ProbeHealthIndicator::new(
                "cache",
                TcpProbe::new(closed_addr, Duration::from_secs(1)),
            )),
        )
        .unwrap();

    // The composite itself never fails, and the worst status wins.
    let health = composite.health().await;
    assert_eq!(health.status(), &Status::down());
    assert_eq!(health.details()["backend"]["status"], "UP");
    assert_eq!(health.details()["backend"]["http_status"], 200);
    assert_eq!(health.details()["cache"]["status"], "DOWN");
    assert!(health.details()["cache"]["error"].as_str().is_some());

    // Over HTTP the same document answers 503.
    let handler = ActuatorHandler::new(Arc::new(composite), Arc::new(Vec::new()));
    let (code, json) = get(&handler, "/health").await;
    assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "DOWN");
    assert_eq!(json["backend"]["status"], "UP");
}

#[tokio::test]
async fn custom_status_order_drives_the_endpoint_code() {
    let mut aggregator = OrderedHealthAggregator::new();
    aggregator.set_status_order(vec![Status::up(), Status::down()]);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open_addr = listener.local_addr().unwrap().to_string();

    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed_addr = closed.local_addr().unwrap().to_string();
    drop(closed);

    let mut composite = CompositeHealthIndicator::new("application", Arc::new(aggregator));
    composite
        .add_indicator(
            "up",
            Arc::new(ProbeHealthIndicator::new(
                "up",
                TcpProbe::new(open_addr, Duration::from_secs(1)),
            )),
        )
        .unwrap();
    composite
        .add_indicator(
            "down",
            Arc::new(ProbeHealthIndicator::new(
                "down",
                TcpProbe::new(closed_addr, Duration::from_secs(1)),
            )),
        )
        .unwrap();

    // UP ranks first in the custom order, so the endpoint answers 200
    // even though one dependency is down.
    let handler = ActuatorHandler::new(Arc::new(composite), Arc::new(Vec::new()));
    let (code, json) = get(&handler, "/health").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(json["status"], "UP");
    assert_eq!(json["down"]["status"], "DOWN");
}

#[tokio::test]
async fn info_endpoint_merges_all_contributors() {
    let mut statics = BTreeMap::new();
    statics.insert("build".to_string(), serde_json::Value::from("42"));

    let contributors: Vec<Box<dyn InfoContributor>> = vec![
        Box::new(SimpleInfoContributor::new("version", "1.2")),
        Box::new(MapInfoContributor::new(statics)),
    ];
    let composite =
        CompositeHealthIndicator::new("application", Arc::new(OrderedHealthAggregator::new()));
    let handler = ActuatorHandler::new(Arc::new(composite), Arc::new(contributors));

    let (code, json) = get(&handler, "/info").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(json["version"], "1.2");
    assert_eq!(json["build"], "42");
}

#[tokio::test]
async fn empty_composite_is_unknown_but_still_answers_200() {
    let composite =
        CompositeHealthIndicator::new("application", Arc::new(OrderedHealthAggregator::new()));
    let handler = ActuatorHandler::new(Arc::new(composite), Arc::new(Vec::new()));

    let (code, json) = get(&handler, "/health").await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(json["status"], "UNKNOWN");
}
