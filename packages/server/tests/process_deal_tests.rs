//! Deal pipeline tests against recording mocks.
//!
//! Cover the readiness gate, the package size per deal type, which deal is
//! checked, and per-location failure accounting.

mod common;

use crate::common::*;
use landing_pages_core::common::ServiceError;
use landing_pages_core::domains::landing_pages::models::{
    Contact, DealTrigger, PageStatus, RunOutcome, RunResponse, WebhookPayload,
};
use landing_pages_core::domains::landing_pages::{handle_deal_event, process_deal};
use landing_pages_core::kernel::test_dependencies::{MockAI, MockCrm};
use landing_pages_core::kernel::TestDependencies;
use serde_json::json;

fn trigger(contact_id: Option<&str>, deal_id: &str) -> DealTrigger {
    DealTrigger {
        deal_id: deal_id.to_string(),
        contact_id: contact_id.map(String::from),
    }
}

fn payload(value: serde_json::Value) -> WebhookPayload {
    serde_json::from_value(value).unwrap()
}

// ============================================================================
// Readiness gate
// ============================================================================

#[tokio::test]
async fn deal_not_ready_is_skipped_without_side_effects() {
    let deps = TestDependencies::new().with_crm(
        MockCrm::new()
            .with_deal(deal_with_status(DEAL_ID, "In Progress"))
            .with_contact(plumber(CONTACT_ID)),
    );

    let outcome = process_deal(&trigger(Some(CONTACT_ID), DEAL_ID), &server_deps(&deps))
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Skipped { ref deal_id, .. } if deal_id == DEAL_ID));
    assert!(deps.ai.calls().is_empty());
    assert!(deps.publisher.row_calls().is_empty());
    assert!(deps.publisher.publish_calls().is_empty());
    assert!(deps.crm.contact_reads().is_empty());
}

#[tokio::test]
async fn missing_site_code_fails_before_any_content_request() {
    let mut deal = ready_deal(DEAL_ID, None);
    deal.site_code = None;
    let deps = TestDependencies::new().with_crm(
        MockCrm::new()
            .with_deal(deal)
            .with_contact(plumber(CONTACT_ID)),
    );

    let response = handle_deal_event(
        payload(json!({"contact_id": CONTACT_ID, "deal_id": DEAL_ID})),
        &server_deps(&deps),
    )
    .await;

    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.error.as_deref(),
        Some("Missing required field: duda_site_code")
    );
    assert!(deps.ai.content_calls().is_empty());
    assert!(deps.publisher.row_calls().is_empty());
}

#[tokio::test]
async fn missing_industry_is_a_bad_request() {
    let deps = TestDependencies::new().with_crm(
        MockCrm::new()
            .with_deal(ready_deal(DEAL_ID, None))
            .with_contact(Contact {
                industry: None,
                ..plumber(CONTACT_ID)
            }),
    );

    let err = process_deal(&trigger(Some(CONTACT_ID), DEAL_ID), &server_deps(&deps))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::MissingField(ref f) if f == "industry_1"));
    assert!(deps.ai.calls().is_empty());
}

#[tokio::test]
async fn unknown_deal_is_not_found() {
    let deps = TestDependencies::new();

    let response = handle_deal_event(
        payload(json!({"contact_id": CONTACT_ID, "deal_id": "D404"})),
        &server_deps(&deps),
    )
    .await;

    assert_eq!(response.status_code, 404);
    assert!(deps.ai.calls().is_empty());
}

// ============================================================================
// Package size
// ============================================================================

#[tokio::test]
async fn power_pages_deal_generates_fifty_pages_in_one_publish() {
    let deps = TestDependencies::new().with_crm(
        MockCrm::new()
            .with_deal(ready_deal(DEAL_ID, Some("Starter Plus Power Pages")))
            .with_contact(plumber(CONTACT_ID)),
    );

    let outcome = process_deal(&trigger(Some(CONTACT_ID), DEAL_ID), &server_deps(&deps))
        .await
        .unwrap();

    let RunOutcome::Published(summary) = outcome else {
        panic!("expected a published run");
    };
    assert_eq!(summary.requested, 50);
    assert_eq!(summary.created, 50);
    assert_eq!(deps.ai.content_calls().len(), 50);

    let calls = deps.publisher.row_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].rows.len(), 50);
    assert_eq!(calls[0].collection, "Location");
}

#[tokio::test]
async fn ten_page_deal_generates_ten_pages() {
    let deps = TestDependencies::new().with_crm(
        MockCrm::new()
            .with_deal(ready_deal(DEAL_ID, Some("Starter Plus $59")))
            .with_contact(plumber(CONTACT_ID)),
    );

    process_deal(&trigger(Some(CONTACT_ID), DEAL_ID), &server_deps(&deps))
        .await
        .unwrap();

    assert_eq!(deps.ai.content_calls().len(), 10);
    let calls = deps.publisher.row_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].rows.len(), 10);
    assert_eq!(calls[0].rows[0].title, "Best Plumbing in Town 1, CO");
}

#[tokio::test]
async fn manual_locations_lead_the_page_list() {
    let priority: Vec<String> = (1..=10).map(|i| format!("suburb {} co", i)).collect();
    let deps = TestDependencies::new().with_crm(
        MockCrm::new()
            .with_deal(ready_deal(DEAL_ID, None))
            .with_contact(Contact {
                manual_locations: priority,
                ..plumber(CONTACT_ID)
            }),
    );

    process_deal(&trigger(Some(CONTACT_ID), DEAL_ID), &server_deps(&deps))
        .await
        .unwrap();

    assert!(deps.ai.location_calls().is_empty());
    let rows = &deps.publisher.row_calls()[0].rows;
    assert_eq!(rows[0].location, "Suburb 1, CO");
    assert_eq!(rows[0].slug, "best-plumbing-suburb-1-co");
}

// ============================================================================
// Deal resolution
// ============================================================================

#[tokio::test]
async fn payload_deal_id_is_the_deal_checked() {
    let deps = TestDependencies::new().with_crm(
        standard_crm()
            .with_deal(deal_with_status("D1", "In Progress"))
            .with_deal_contact("D1", CONTACT_ID),
    );

    let response = handle_deal_event(
        payload(json!([{"contact_id": CONTACT_ID, "deal_id": DEAL_ID}])),
        &server_deps(&deps),
    )
    .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.created, Some(10));
    assert_eq!(deps.crm.deal_reads(), vec![DEAL_ID.to_string()]);
}

#[tokio::test]
async fn deal_event_resolves_contact_from_association() {
    let deps = TestDependencies::new().with_crm(standard_crm());

    let response = handle_deal_event(
        payload(json!([{"objectId": 2, "subscriptionType": "deal.propertyChange"}])),
        &server_deps(&deps),
    )
    .await;

    // objectId 2 is not D2; the deal id is taken as given
    assert_eq!(response.status_code, 404);
    assert_eq!(deps.crm.deal_reads(), vec!["2".to_string()]);

    let deps = TestDependencies::new().with_crm(standard_crm());
    let response = handle_deal_event(
        payload(json!({"objectId": DEAL_ID, "subscriptionType": "deal.propertyChange"})),
        &server_deps(&deps),
    )
    .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.contact_id.as_deref(), Some(CONTACT_ID));
    assert_eq!(deps.crm.contact_reads(), vec![CONTACT_ID.to_string()]);
}

#[tokio::test]
async fn contact_only_event_is_rejected() {
    let deps = TestDependencies::new().with_crm(standard_crm());

    let response = handle_deal_event(
        payload(json!({"contact_id": CONTACT_ID})),
        &server_deps(&deps),
    )
    .await;

    assert_eq!(response.status_code, 400);
    assert!(deps.crm.deal_reads().is_empty());
}

// ============================================================================
// Failure accounting
// ============================================================================

#[tokio::test]
async fn content_failure_is_reported_for_that_location_only() {
    let ai = MockAI::new().with_responder(|request| {
        if request.user.contains("about Plumbing in Town 3, CO") {
            Err(ServiceError::upstream("OpenAI", "rate limited"))
        } else {
            MockAI::default_response(request)
        }
    });
    let deps = TestDependencies::new().with_crm(standard_crm()).with_ai(ai);

    let response = handle_deal_event(
        payload(json!({"contact_id": CONTACT_ID, "deal_id": DEAL_ID})),
        &server_deps(&deps),
    )
    .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.created, Some(9));
    assert_eq!(response.failed, Some(1));

    let pages = response.pages.unwrap();
    let failed: Vec<_> = pages.iter().filter(|p| !p.is_created()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].location, "Town 3, CO");
    assert!(matches!(failed[0].status, PageStatus::Failed { .. }));

    // The failed location is never sent to the CMS
    let rows = &deps.publisher.row_calls()[0].rows;
    assert_eq!(rows.len(), 9);
    assert!(rows.iter().all(|r| r.location != "Town 3, CO"));
}

#[tokio::test]
async fn every_run_is_recorded() {
    let deps = TestDependencies::new().with_crm(
        standard_crm().with_deal(deal_with_status("D7", "In Progress")),
    );
    let server_deps = server_deps(&deps);

    handle_deal_event(payload(json!({"deal_id": DEAL_ID})), &server_deps).await;
    handle_deal_event(payload(json!({"deal_id": "D7"})), &server_deps).await;
    handle_deal_event(payload(json!({"deal_id": "D404"})), &server_deps).await;

    let outcomes: Vec<&str> = deps.run_log.runs().iter().map(|r| r.outcome).collect();
    assert_eq!(outcomes, vec!["published", "skipped", "failed"]);
    assert_eq!(deps.notifier.sent().len(), 3);
}

#[tokio::test]
async fn failing_side_outputs_do_not_change_the_response() {
    let deps = TestDependencies::new()
        .with_crm(standard_crm())
        .with_failing_side_outputs();

    let response: RunResponse = handle_deal_event(
        payload(json!({"contact_id": CONTACT_ID, "deal_id": DEAL_ID})),
        &server_deps(&deps),
    )
    .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.created, Some(10));
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn small_deal_end_to_end() {
    let deps = TestDependencies::new().with_crm(standard_crm());

    let response = handle_deal_event(
        payload(json!({"contact_id": "C1", "deal_id": "D2"})),
        &server_deps(&deps),
    )
    .await;

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["created"], 10);
    assert_eq!(json["failed"], 0);
    assert_eq!(json["siteCode"], "S9");

    assert_eq!(deps.ai.content_calls().len(), 10);
    let calls = deps.publisher.row_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].site_code, "S9");
    assert_eq!(calls[0].rows.len(), 10);
    // Deal runs only fill the collection; the live site is not republished
    assert!(deps.publisher.publish_calls().is_empty());
}
