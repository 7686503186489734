// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The page pipeline lives in domains/landing_pages/activities and talks to the
// outside world only through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseCrm)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::ServiceResult;
use crate::domains::landing_pages::models::{Contact, Deal, PageRow, PageRun};

// =============================================================================
// CRM Trait (Infrastructure - deals and contacts)
// =============================================================================

#[async_trait]
pub trait BaseCrm: Send + Sync {
    /// Fetch a deal with the properties the pipeline reads
    async fn get_deal(&self, deal_id: &str) -> ServiceResult<Deal>;

    /// Fetch a contact with industry, location and manual location properties
    async fn get_contact(&self, contact_id: &str) -> ServiceResult<Contact>;

    /// First contact associated with a deal, if any
    async fn find_deal_contact(&self, deal_id: &str) -> ServiceResult<Option<String>>;
}

// =============================================================================
// AI Trait (Infrastructure - chat completion)
// =============================================================================

/// A single system + user prompt exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.7,
            max_tokens: 150,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response)
    async fn complete(&self, request: CompletionRequest) -> ServiceResult<String>;
}

// =============================================================================
// Page Publisher Trait (Infrastructure - CMS collection)
// =============================================================================

#[async_trait]
pub trait BasePagePublisher: Send + Sync {
    /// Insert rows into a site's dynamic content collection in one call
    async fn create_rows(&self, site_code: &str, collection: &str, rows: &[PageRow])
        -> ServiceResult<()>;

    /// Publish the site so new collection rows go live
    async fn publish_site(&self, site_code: &str) -> ServiceResult<()>;
}

// =============================================================================
// Run Log Trait (Infrastructure - append-only run records)
// =============================================================================

#[async_trait]
pub trait BaseRunLog: Send + Sync {
    async fn record(&self, run: &PageRun) -> Result<()>;
}

// =============================================================================
// Notifier Trait (Infrastructure - run summary email)
// =============================================================================

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> Result<()>;
}
