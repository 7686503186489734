//! Server dependencies for activities (using traits for testability)
//!
//! This module provides the central dependency container used by the landing
//! page activities. All external services sit behind trait abstractions so the
//! pipeline can be driven with `TestDependencies` in tests.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use duda_client::{CollectionRow, DudaClient, DudaError};
use hubspot_client::{HubSpotClient, HubSpotError};
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};
use sqlx::postgres::PgPoolOptions;

use crate::common::{ServiceError, ServiceResult};
use crate::config::Config;
use crate::domains::landing_pages::models::{
    manual_location_properties, Contact, Deal, PageRow, PipelineSettings,
    CONTACT_CITY_PROPERTY, CONTACT_COMPANY_PROPERTY, CONTACT_INDUSTRY_PROPERTY,
    CONTACT_STATE_PROPERTY, DEAL_PROPERTIES, DEAL_SITE_CODE_PROPERTY, DEAL_STATUS_PROPERTY,
    DEAL_TYPE_PROPERTY,
};
use crate::kernel::{
    BaseAI, BaseCrm, BaseNotifier, BasePagePublisher, BaseRunLog, CompletionRequest, NoopNotifier,
    NoopRunLog, PostgresRunLog, SmtpNotifier,
};

/// Collection fields the site templates bind to.
pub const LOCATION_NAME_FIELD: &str = "Location Name";
pub const LOCATION_DESCRIPTION_FIELD: &str = "Location Description";

// =============================================================================
// HubSpotClient Adapter (implements BaseCrm trait)
// =============================================================================

/// Wrapper around HubSpotClient that implements BaseCrm trait
pub struct HubSpotAdapter(pub Arc<HubSpotClient>);

impl HubSpotAdapter {
    pub fn new(client: Arc<HubSpotClient>) -> Self {
        Self(client)
    }
}

fn hubspot_error(e: HubSpotError) -> ServiceError {
    match e {
        HubSpotError::NotFound { object, id } => ServiceError::NotFound {
            resource: match object.as_str() {
                "deals" => "deal",
                "contacts" => "contact",
                _ => "CRM object",
            },
            id,
        },
        HubSpotError::Api { status, message } => ServiceError::Upstream {
            service: "HubSpot",
            status: Some(status),
            message,
        },
        HubSpotError::Network(e) => ServiceError::upstream("HubSpot", e.to_string()),
    }
}

#[async_trait]
impl BaseCrm for HubSpotAdapter {
    async fn get_deal(&self, deal_id: &str) -> ServiceResult<Deal> {
        let deal = self
            .0
            .get_deal(deal_id, &DEAL_PROPERTIES)
            .await
            .map_err(hubspot_error)?;

        let prop = |name: &str| deal.property(name).map(String::from);
        Ok(Deal {
            status: deal.raw_property(DEAL_STATUS_PROPERTY).map(String::from),
            site_code: prop(DEAL_SITE_CODE_PROPERTY),
            deal_type: prop(DEAL_TYPE_PROPERTY),
            id: deal.id.clone(),
        })
    }

    async fn get_contact(&self, contact_id: &str) -> ServiceResult<Contact> {
        let properties = Contact::properties();
        let properties: Vec<&str> = properties.iter().map(String::as_str).collect();

        let contact = self
            .0
            .get_contact(contact_id, &properties)
            .await
            .map_err(hubspot_error)?;

        let prop = |name: &str| contact.property(name).map(String::from);
        Ok(Contact {
            city: prop(CONTACT_CITY_PROPERTY),
            state: prop(CONTACT_STATE_PROPERTY),
            industry: prop(CONTACT_INDUSTRY_PROPERTY),
            company_name: prop(CONTACT_COMPANY_PROPERTY),
            manual_locations: manual_location_properties()
                .filter_map(|name| prop(&name))
                .collect(),
            id: contact.id.clone(),
        })
    }

    async fn find_deal_contact(&self, deal_id: &str) -> ServiceResult<Option<String>> {
        let associations = self
            .0
            .get_associations("deals", deal_id, "contacts")
            .await
            .map_err(hubspot_error)?;
        Ok(associations.into_iter().next().map(|a| a.id))
    }
}

// =============================================================================
// OpenAIClient Adapter (implements BaseAI trait)
// =============================================================================

/// Wrapper around OpenAIClient that implements BaseAI trait with a fixed model
pub struct OpenAIAdapter {
    client: Arc<OpenAIClient>,
    model: String,
}

impl OpenAIAdapter {
    pub fn new(client: Arc<OpenAIClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

fn openai_error(e: OpenAIError) -> ServiceError {
    if e.is_rate_limited() {
        tracing::warn!("OpenAI rate limit hit; consider raising API_CALL_DELAY");
    }
    match e {
        OpenAIError::Api { status, message } => ServiceError::Upstream {
            service: "OpenAI",
            status: Some(status),
            message,
        },
        other => ServiceError::upstream("OpenAI", other.to_string()),
    }
}

#[async_trait]
impl BaseAI for OpenAIAdapter {
    async fn complete(&self, request: CompletionRequest) -> ServiceResult<String> {
        let response = self
            .client
            .chat_completion(
                ChatRequest::new(&self.model)
                    .message(Message::system(request.system))
                    .message(Message::user(request.user))
                    .temperature(request.temperature)
                    .max_tokens(request.max_tokens),
            )
            .await
            .map_err(openai_error)?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %self.model,
                total_tokens = usage.total_tokens,
                "Chat completion finished"
            );
        }
        Ok(response.content)
    }
}

// =============================================================================
// DudaClient Adapter (implements BasePagePublisher trait)
// =============================================================================

/// Wrapper around DudaClient that implements BasePagePublisher trait
pub struct DudaAdapter(pub Arc<DudaClient>);

impl DudaAdapter {
    pub fn new(client: Arc<DudaClient>) -> Self {
        Self(client)
    }
}

fn duda_error(e: DudaError) -> ServiceError {
    match e {
        DudaError::NotFound(what) => ServiceError::NotFound {
            resource: "Duda resource",
            id: what,
        },
        DudaError::Api { status, message } => ServiceError::Upstream {
            service: "Duda",
            status: Some(status),
            message,
        },
        other => ServiceError::upstream("Duda", other.to_string()),
    }
}

/// CMS row for a page: the slug plus the two fields the location template reads.
pub fn collection_row(row: &PageRow) -> CollectionRow {
    CollectionRow::new(&row.slug)
        .field(LOCATION_NAME_FIELD, &row.title)
        .field(LOCATION_DESCRIPTION_FIELD, &row.description)
}

#[async_trait]
impl BasePagePublisher for DudaAdapter {
    async fn create_rows(
        &self,
        site_code: &str,
        collection: &str,
        rows: &[PageRow],
    ) -> ServiceResult<()> {
        let rows: Vec<CollectionRow> = rows.iter().map(collection_row).collect();
        self.0
            .create_collection_rows(site_code, collection, &rows)
            .await
            .map_err(duda_error)
    }

    async fn publish_site(&self, site_code: &str) -> ServiceResult<()> {
        self.0.publish_site(site_code).await.map_err(duda_error)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub crm: Arc<dyn BaseCrm>,
    pub ai: Arc<dyn BaseAI>,
    pub publisher: Arc<dyn BasePagePublisher>,
    /// Append-only run log (Postgres when DATABASE_URL is set)
    pub run_log: Arc<dyn BaseRunLog>,
    /// Run summary emails (SMTP when NOTIFICATION_EMAIL and SMTP_HOST are set)
    pub notifier: Arc<dyn BaseNotifier>,
    pub settings: PipelineSettings,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        crm: Arc<dyn BaseCrm>,
        ai: Arc<dyn BaseAI>,
        publisher: Arc<dyn BasePagePublisher>,
        run_log: Arc<dyn BaseRunLog>,
        notifier: Arc<dyn BaseNotifier>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            crm,
            ai,
            publisher,
            run_log,
            notifier,
            settings,
        }
    }

    /// Build the production clients from configuration.
    ///
    /// Connects to Postgres and runs migrations when a database is configured.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let hubspot = HubSpotClient::new(config.hubspot_api_key.clone());
        let openai = OpenAIClient::new(config.openai_api_key.clone());
        let duda = DudaClient::new(
            config.duda_api_user.clone(),
            config.duda_api_pass.clone(),
            config.environment,
        );

        let run_log: Arc<dyn BaseRunLog> = match &config.database_url {
            Some(url) => {
                tracing::info!("Connecting to run log database...");
                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(url)
                    .await
                    .context("Failed to connect to database")?;
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run migrations")?;
                tracing::info!("Run log database ready");
                Arc::new(PostgresRunLog::new(pool))
            }
            None => {
                tracing::info!("DATABASE_URL not set, runs are only logged");
                Arc::new(NoopRunLog)
            }
        };

        let notifier: Arc<dyn BaseNotifier> = match &config.notification {
            Some(notification) => Arc::new(
                SmtpNotifier::new(notification.clone())
                    .context("Failed to set up notification email")?,
            ),
            None => Arc::new(NoopNotifier),
        };

        Ok(Self::new(
            Arc::new(HubSpotAdapter::new(Arc::new(hubspot))),
            Arc::new(OpenAIAdapter::new(Arc::new(openai), &config.openai_model)),
            Arc::new(DudaAdapter::new(Arc::new(duda))),
            run_log,
            notifier,
            PipelineSettings::from_config(config),
        ))
    }
}
