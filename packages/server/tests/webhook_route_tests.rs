//! HTTP surface tests: health, webhook and direct generation routes.

mod common;

use crate::common::*;
use axum::http::StatusCode;
use landing_pages_core::kernel::test_dependencies::{MockAI, MockCrm, MockPagePublisher};
use landing_pages_core::kernel::TestDependencies;
use serde_json::json;

#[tokio::test]
async fn health_routes_report_service_name() {
    let harness = TestHarness::new(TestDependencies::new());

    for uri in ["/", "/health"] {
        let (status, body) = harness.get(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "service": "landing-page-service"}));
    }
}

// ============================================================================
// POST /webhook
// ============================================================================

#[tokio::test]
async fn webhook_publishes_pages_for_ready_deal() {
    let harness = TestHarness::new(TestDependencies::new().with_crm(standard_crm()));

    let (status, body) = harness
        .post_json("/webhook", json!([{"contact_id": "C1", "deal_id": "D2"}]))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["created"], 10);
    assert_eq!(body["failed"], 0);
    assert_eq!(body["dealId"], "D2");
    assert_eq!(body["pages"].as_array().unwrap().len(), 10);
    assert_eq!(body["pages"][0]["status"], "created");
    assert!(harness.deps.publisher.publish_calls().is_empty());
}

#[tokio::test]
async fn webhook_skip_is_a_success() {
    let harness = TestHarness::new(TestDependencies::new().with_crm(
        MockCrm::new().with_deal(deal_with_status(DEAL_ID, "Closed Won")),
    ));

    let (status, body) = harness
        .post_json("/webhook", json!({"deal_id": DEAL_ID}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusCode"], 200);
    assert!(body["message"].as_str().unwrap().starts_with("Skipped"));
    assert!(harness.deps.publisher.row_calls().is_empty());
}

#[tokio::test]
async fn webhook_errors_carry_matching_status() {
    let harness = TestHarness::new(TestDependencies::new().with_crm(standard_crm()));

    let (status, body) = harness.post_json("/webhook", json!([])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);
    assert!(body["error"].is_string());

    let (status, body) = harness.post_raw("/webhook", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);

    let (status, body) = harness
        .post_json("/webhook", json!({"deal_id": "D404"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusCode"], 404);
}

#[tokio::test]
async fn webhook_reports_gateway_error_when_no_page_lands() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .with_crm(standard_crm())
            .with_publisher(MockPagePublisher::new().failing()),
    );

    let (status, body) = harness
        .post_json("/webhook", json!({"contact_id": "C1", "deal_id": "D2"}))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["created"], 0);
    assert_eq!(body["failed"], 10);
    assert!(harness.deps.publisher.publish_calls().is_empty());
}

#[tokio::test]
async fn webhook_location_failure_is_a_gateway_error() {
    let harness = TestHarness::new(
        TestDependencies::new()
            .with_crm(standard_crm())
            .with_ai(MockAI::new().with_response("I can't help with that.")),
    );

    let (status, body) = harness
        .post_json("/webhook", json!({"contact_id": "C1", "deal_id": "D2"}))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["statusCode"], 502);
    assert!(harness.deps.ai.content_calls().is_empty());
}

// ============================================================================
// POST /generate
// ============================================================================

#[tokio::test]
async fn generate_creates_requested_number_of_pages() {
    let harness = TestHarness::new(TestDependencies::new());

    let (status, body) = harness
        .post_json(
            "/generate",
            json!({
                "site_code": "S9",
                "industry": "Roofing",
                "base_location": "denver co",
                "num_pages": 12,
                "collection_name": "Service Areas"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["pages_created"], 12);
    assert_eq!(body["locations"].as_array().unwrap().len(), 12);
    assert_eq!(body["locations"][0], "Roofing in Town 1, CO");
    assert_eq!(body["pages"][0]["slug"], "town-1-co");

    let location_calls = harness.deps.ai.location_calls();
    assert!(location_calls[0].user.contains("around Denver, CO"));

    let calls = harness.deps.publisher.row_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].collection, "Service Areas");
    assert_eq!(calls[0].rows[0].slug, "town-1-co");
    assert_eq!(calls[0].rows[0].title, "Roofing in Town 1, CO");
    assert_eq!(harness.deps.publisher.publish_calls(), vec!["S9".to_string()]);

    let runs = harness.deps.run_log.runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].trigger, "direct");
}

#[tokio::test]
async fn generate_validates_request() {
    let harness = TestHarness::new(TestDependencies::new());

    let (status, body) = harness
        .post_json(
            "/generate",
            json!({"site_code": "S9", "industry": "Roofing", "base_location": "Denver, CO", "num_pages": 500}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _) = harness
        .post_json("/generate", json!({"site_code": "S9"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(harness.deps.ai.calls().is_empty());
}
