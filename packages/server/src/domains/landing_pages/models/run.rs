use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::page::PageResult;
use crate::common::ServiceError;

/// Aggregated page results of one completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub contact_id: Option<String>,
    pub deal_id: Option<String>,
    pub site_code: String,
    pub requested: usize,
    pub created: usize,
    pub failed: usize,
    pub pages: Vec<PageResult>,
}

impl RunSummary {
    pub fn new(
        contact_id: Option<String>,
        deal_id: Option<String>,
        site_code: String,
        requested: usize,
        pages: Vec<PageResult>,
    ) -> Self {
        let created = pages.iter().filter(|p| p.is_created()).count();
        Self {
            contact_id,
            deal_id,
            site_code,
            requested,
            created,
            failed: pages.len() - created,
            pages,
        }
    }

    pub fn nothing_created(&self) -> bool {
        self.created == 0 && self.failed > 0
    }
}

/// How a webhook-triggered run ended, when it did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Published(RunSummary),
    /// Deal was not "Ready for Published"; nothing was generated.
    Skipped {
        deal_id: String,
        status: Option<String>,
    },
}

/// Append-only log record of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRun {
    pub id: Uuid,
    pub trigger: &'static str,
    pub contact_id: Option<String>,
    pub deal_id: Option<String>,
    pub site_code: Option<String>,
    pub outcome: &'static str,
    pub requested: i32,
    pub created: i32,
    pub failed: i32,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub const TRIGGER_WEBHOOK: &str = "webhook";
pub const TRIGGER_DIRECT: &str = "direct";

impl PageRun {
    fn base(trigger: &'static str, outcome: &'static str) -> Self {
        Self {
            id: Uuid::now_v7(),
            trigger,
            contact_id: None,
            deal_id: None,
            site_code: None,
            outcome,
            requested: 0,
            created: 0,
            failed: 0,
            error: None,
            created_at: Utc::now(),
        }
    }

    pub fn published(trigger: &'static str, summary: &RunSummary) -> Self {
        let outcome = if summary.nothing_created() {
            "failed"
        } else {
            "published"
        };
        Self {
            contact_id: summary.contact_id.clone(),
            deal_id: summary.deal_id.clone(),
            site_code: Some(summary.site_code.clone()),
            requested: summary.requested as i32,
            created: summary.created as i32,
            failed: summary.failed as i32,
            ..Self::base(trigger, outcome)
        }
    }

    pub fn skipped(deal_id: &str, contact_id: Option<String>) -> Self {
        Self {
            deal_id: Some(deal_id.to_string()),
            contact_id,
            ..Self::base(TRIGGER_WEBHOOK, "skipped")
        }
    }

    pub fn failed(
        trigger: &'static str,
        deal_id: Option<String>,
        contact_id: Option<String>,
        error: &ServiceError,
    ) -> Self {
        Self {
            deal_id,
            contact_id,
            error: Some(format!("{}: {}", error.kind(), error)),
            ..Self::base(trigger, "failed")
        }
    }

    /// One-line summary for logs and notification subjects.
    pub fn headline(&self) -> String {
        let target = self
            .site_code
            .as_deref()
            .or(self.deal_id.as_deref())
            .unwrap_or("unknown");
        match self.outcome {
            "skipped" => format!("Landing pages skipped for deal {}", target),
            "failed" if self.created == 0 && self.failed == 0 => {
                format!("Landing page run failed for {}", target)
            }
            _ => format!(
                "Landing pages for {}: {} created, {} failed",
                target, self.created, self.failed
            ),
        }
    }
}

/// Structured reply of the webhook: a status code plus either a summary or an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<PageResult>>,
}

impl RunResponse {
    fn empty(status: StatusCode) -> Self {
        Self {
            status_code: status.as_u16(),
            message: None,
            error: None,
            created: None,
            failed: None,
            contact_id: None,
            deal_id: None,
            site_code: None,
            pages: None,
        }
    }

    pub fn error(err: &ServiceError) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Self::empty(err.status_code())
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<RunOutcome> for RunResponse {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Skipped { deal_id, status } => Self {
                message: Some(format!(
                    "Skipped - status not {} (was {})",
                    super::READY_FOR_PUBLISHED,
                    status.as_deref().unwrap_or("unset")
                )),
                deal_id: Some(deal_id),
                ..Self::empty(StatusCode::OK)
            },
            RunOutcome::Published(summary) => {
                let (status, message, error) = if summary.nothing_created() {
                    (
                        StatusCode::BAD_GATEWAY,
                        None,
                        Some("No pages were created".to_string()),
                    )
                } else if summary.failed > 0 {
                    (
                        StatusCode::OK,
                        Some(format!("Pages created with {} failures", summary.failed)),
                        None,
                    )
                } else {
                    (StatusCode::OK, Some("Pages created successfully".to_string()), None)
                };

                Self {
                    message,
                    error,
                    created: Some(summary.created),
                    failed: Some(summary.failed),
                    contact_id: summary.contact_id,
                    deal_id: summary.deal_id,
                    site_code: Some(summary.site_code),
                    pages: Some(summary.pages),
                    ..Self::empty(status)
                }
            }
        }
    }
}
