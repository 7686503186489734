//! Side outputs of a finished run: the run log and the summary email.
//!
//! Neither may change the caller's response, so failures are only logged.

use tracing::{info, warn};

use crate::domains::landing_pages::models::PageRun;
use crate::kernel::ServerDeps;

pub async fn record_run(deps: &ServerDeps, run: &PageRun) {
    info!(
        run_id = %run.id,
        trigger = run.trigger,
        outcome = run.outcome,
        deal_id = run.deal_id.as_deref(),
        site_code = run.site_code.as_deref(),
        created = run.created,
        failed = run.failed,
        "{}",
        run.headline()
    );

    if let Err(e) = deps.run_log.record(run).await {
        warn!(run_id = %run.id, error = %e, "Failed to record page run");
    }

    if let Err(e) = deps.notifier.notify(&run.headline(), &summary_body(run)).await {
        warn!(run_id = %run.id, error = %e, "Failed to send run notification");
    }
}

/// Plain-text email body.
pub fn summary_body(run: &PageRun) -> String {
    let mut lines = vec![
        run.headline(),
        String::new(),
        format!("Outcome: {}", run.outcome),
        format!("Trigger: {}", run.trigger),
    ];
    if let Some(deal_id) = &run.deal_id {
        lines.push(format!("Deal: {}", deal_id));
    }
    if let Some(contact_id) = &run.contact_id {
        lines.push(format!("Contact: {}", contact_id));
    }
    if let Some(site_code) = &run.site_code {
        lines.push(format!("Site: {}", site_code));
    }
    if run.requested > 0 {
        lines.push(format!(
            "Pages: {} requested, {} created, {} failed",
            run.requested, run.created, run.failed
        ));
    }
    if let Some(error) = &run.error {
        lines.push(format!("Error: {}", error));
    }
    lines.push(format!("Run: {} at {}", run.id, run.created_at.to_rfc3339()));
    lines.join("\n")
}
