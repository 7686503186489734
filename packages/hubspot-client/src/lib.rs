//! Pure HubSpot CRM REST API client.
//!
//! Reads deals, contacts and their associations through the CRM v3 objects
//! API using a private-app bearer token.
//!
//! # Example
//!
//! ```rust,ignore
//! use hubspot_client::HubSpotClient;
//!
//! let client = HubSpotClient::new("pat-na1-...".into());
//!
//! let deal = client.get_deal("1234", &["website_status", "dealtype"]).await?;
//! println!("{:?}", deal.property("website_status"));
//! ```

pub mod error;
pub mod types;

pub use error::{HubSpotError, Result};
pub use types::{Association, AssociationList, CrmObject};

use reqwest::StatusCode;

const BASE_URL: &str = "https://api.hubapi.com";

pub struct HubSpotClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl HubSpotClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch a deal with the given properties.
    pub async fn get_deal(&self, deal_id: &str, properties: &[&str]) -> Result<CrmObject> {
        self.get_object("deals", deal_id, properties).await
    }

    /// Fetch a contact with the given properties.
    pub async fn get_contact(&self, contact_id: &str, properties: &[&str]) -> Result<CrmObject> {
        self.get_object("contacts", contact_id, properties).await
    }

    /// Fetch a CRM object by type and id.
    pub async fn get_object(
        &self,
        object_type: &str,
        id: &str,
        properties: &[&str],
    ) -> Result<CrmObject> {
        let url = format!("{}/crm/v3/objects/{}/{}", self.base_url, object_type, id);
        let mut request = self.client.get(&url).bearer_auth(&self.token);
        if !properties.is_empty() {
            request = request.query(&[("properties", properties.join(","))]);
        }

        let resp = request.send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(HubSpotError::NotFound {
                object: object_type.to_string(),
                id: id.to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(object_type, id, status = status.as_u16(), "HubSpot object read failed");
            return Err(HubSpotError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let object: CrmObject = resp.json().await?;
        tracing::debug!(object_type, id, properties = object.properties.len(), "Fetched HubSpot object");
        Ok(object)
    }

    /// List ids of `to_type` objects associated with an object, in HubSpot's order.
    pub async fn get_associations(
        &self,
        from_type: &str,
        id: &str,
        to_type: &str,
    ) -> Result<Vec<Association>> {
        let url = format!(
            "{}/crm/v3/objects/{}/{}/associations/{}",
            self.base_url, from_type, id, to_type
        );
        let resp = self.client.get(&url).bearer_auth(&self.token).send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(HubSpotError::NotFound {
                object: from_type.to_string(),
                id: id.to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(HubSpotError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let list: AssociationList = resp.json().await?;
        Ok(list.results)
    }
}
