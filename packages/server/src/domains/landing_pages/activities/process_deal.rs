//! Deal pipeline - the webhook's business logic.
//!
//! deal → readiness check → contact → locations → copy → collection rows.
//! The live site is left unpublished.
//! Every remote call is awaited in order; nothing is retried.

use tracing::{error, info};

use super::derive_locations::{derive_locations, LocationRequest};
use super::generate_content::generate_all;
use super::publish_pages::{publish_pages, PublishTarget};
use super::record_run::record_run;
use crate::common::{ServiceError, ServiceResult};
use crate::domains::landing_pages::models::{
    DealTrigger, PageNaming, PageRun, RunOutcome, RunResponse, RunSummary, WebhookPayload,
    TRIGGER_WEBHOOK,
};
use crate::kernel::ServerDeps;

/// Run the pipeline for one deal.
///
/// A deal that is not "Ready for Published" ends as [`RunOutcome::Skipped`]
/// before anything is generated. A missing site code or industry ends the run
/// before any content request.
pub async fn process_deal(trigger: &DealTrigger, deps: &ServerDeps) -> ServiceResult<RunOutcome> {
    let deal = deps.crm.get_deal(&trigger.deal_id).await?;

    if !deal.is_ready() {
        info!(
            deal_id = %deal.id,
            status = deal.status.as_deref().unwrap_or("<none>"),
            "Deal is not ready for publishing, skipping"
        );
        return Ok(RunOutcome::Skipped {
            deal_id: deal.id,
            status: deal.status,
        });
    }

    let site_code = deal
        .site_code
        .clone()
        .ok_or_else(|| ServiceError::missing("duda_site_code"))?;

    let contact_id = match &trigger.contact_id {
        Some(id) => id.clone(),
        None => deps
            .crm
            .find_deal_contact(&deal.id)
            .await?
            .ok_or_else(|| ServiceError::missing("contact_id"))?,
    };

    let contact = deps.crm.get_contact(&contact_id).await?;
    let industry = contact
        .industry
        .clone()
        .ok_or_else(|| ServiceError::missing("industry_1"))?;

    let settings = &deps.settings;
    let page_count = deal.page_count(settings.default_page_count);
    info!(
        deal_id = %deal.id,
        contact_id = %contact_id,
        site_code = %site_code,
        industry = %industry,
        pages = page_count.get(),
        "Generating landing pages"
    );

    let base_city = contact.base_city();
    let locations = derive_locations(
        deps.ai.as_ref(),
        LocationRequest {
            base_city: base_city.as_deref(),
            count: page_count.get(),
            industry: &industry,
            priority: &contact.manual_locations,
        },
    )
    .await?;

    let contents = generate_all(
        deps.ai.as_ref(),
        settings,
        &industry,
        contact.company_name.as_deref(),
        &locations,
    )
    .await;

    let pages = publish_pages(
        deps.publisher.as_ref(),
        settings,
        PublishTarget {
            site_code: &site_code,
            collection: &settings.collection,
            industry: &industry,
            naming: PageNaming::BestOf,
            publish: false,
        },
        contents,
    )
    .await;

    Ok(RunOutcome::Published(RunSummary::new(
        Some(contact_id),
        Some(deal.id),
        site_code,
        page_count.get(),
        pages,
    )))
}

/// Webhook boundary: resolve the payload, run the pipeline, record the run,
/// and turn whatever happened into a [`RunResponse`].
pub async fn handle_deal_event(payload: WebhookPayload, deps: &ServerDeps) -> RunResponse {
    let trigger = match payload.first_event().and_then(|event| event.into_trigger()) {
        Ok(trigger) => trigger,
        Err(e) => {
            error!(error = %e, "Rejected webhook payload");
            record_run(deps, &PageRun::failed(TRIGGER_WEBHOOK, None, None, &e)).await;
            return RunResponse::error(&e);
        }
    };

    match process_deal(&trigger, deps).await {
        Ok(outcome) => {
            let run = match &outcome {
                RunOutcome::Published(summary) => PageRun::published(TRIGGER_WEBHOOK, summary),
                RunOutcome::Skipped { deal_id, .. } => {
                    PageRun::skipped(deal_id, trigger.contact_id.clone())
                }
            };
            record_run(deps, &run).await;
            RunResponse::from(outcome)
        }
        Err(e) => {
            error!(deal_id = %trigger.deal_id, error = %e, "Landing page run failed");
            let run = PageRun::failed(
                TRIGGER_WEBHOOK,
                Some(trigger.deal_id.clone()),
                trigger.contact_id.clone(),
                &e,
            );
            record_run(deps, &run).await;
            RunResponse::error(&e)
        }
    }
}
