//! Pure Duda REST API client.
//!
//! Covers the small part of the Duda partner API needed to fill Dynamic
//! Content Manager collections and republish a site.
//!
//! # Example
//!
//! ```rust,ignore
//! use duda_client::{CollectionRow, DudaClient, DudaEnvironment};
//!
//! let client = DudaClient::new("user".into(), "pass".into(), DudaEnvironment::Production);
//!
//! let row = CollectionRow::new("best-plumbing-boulder-co")
//!     .field("Location Name", "Best Plumbing in Boulder, CO");
//! client.create_collection_rows("2d659bec", "Location", &[row]).await?;
//! client.publish_site("2d659bec").await?;
//! ```

pub mod error;
pub mod types;

pub use error::{DudaError, Result};
pub use types::{CollectionRow, DudaEnvironment, SiteInfo};

use reqwest::{RequestBuilder, Response, StatusCode};

pub struct DudaClient {
    client: reqwest::Client,
    api_user: String,
    api_pass: String,
    base_url: String,
}

impl DudaClient {
    pub fn new(api_user: String, api_pass: String, environment: DudaEnvironment) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_user,
            api_pass,
            base_url: environment.base_url().to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.api_user, Some(&self.api_pass))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Turn a non-2xx response into an error, keeping the body for diagnostics.
    async fn check(resp: Response, resource: &str) -> Result<Response> {
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DudaError::NotFound(resource.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(resource, status = status.as_u16(), body = %body, "Duda API error");
            return Err(DudaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp)
    }

    /// Fetch site details.
    pub async fn get_site(&self, site_name: &str) -> Result<SiteInfo> {
        let url = format!("{}/sites/multiscreen/{}", self.base_url, site_name);
        let resp = self.authed(self.client.get(&url)).send().await?;
        let resp = Self::check(resp, &format!("site {}", site_name)).await?;
        Ok(resp.json().await?)
    }

    /// Append rows to a Dynamic Content Manager collection in one request.
    pub async fn create_collection_rows(
        &self,
        site_name: &str,
        collection_name: &str,
        rows: &[CollectionRow],
    ) -> Result<()> {
        let url = format!(
            "{}/sites/multiscreen/{}/collection/{}/row",
            self.base_url, site_name, collection_name
        );
        tracing::info!(site_name, collection_name, rows = rows.len(), "Creating collection rows");

        let resp = self.authed(self.client.post(&url)).json(rows).send().await?;
        Self::check(resp, &format!("collection {} on site {}", collection_name, site_name)).await?;

        tracing::info!(site_name, collection_name, rows = rows.len(), "Collection rows created");
        Ok(())
    }

    /// Publish the site so new dynamic pages go live.
    pub async fn publish_site(&self, site_name: &str) -> Result<()> {
        let url = format!("{}/sites/multiscreen/publish/{}", self.base_url, site_name);
        tracing::info!(site_name, "Publishing site");

        let resp = self.authed(self.client.post(&url)).send().await?;
        Self::check(resp, &format!("site {}", site_name)).await?;
        Ok(())
    }
}
