//! Test harness driving the router against recording mocks.

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use landing_pages_core::domains::landing_pages::models::PipelineSettings;
use landing_pages_core::kernel::{ServerDeps, TestDependencies};
use landing_pages_core::server::build_app;
use serde_json::Value;
use tower::ServiceExt;

/// Pipeline settings without the pause between content calls.
pub fn test_settings() -> PipelineSettings {
    PipelineSettings {
        api_call_delay: Duration::ZERO,
        ..Default::default()
    }
}

/// Initialize tracing once; respects RUST_LOG.
/// Run tests with: RUST_LOG=debug cargo test -- --nocapture
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn server_deps(deps: &TestDependencies) -> ServerDeps {
    init_tracing();
    deps.clone().into_deps(test_settings())
}

pub struct TestHarness {
    /// Mocks behind the app; inspect them after a request
    pub deps: TestDependencies,
    app: Router,
}

impl TestHarness {
    pub fn new(deps: TestDependencies) -> Self {
        let app = build_app(server_deps(&deps));
        Self { deps, app }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, &body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}
