use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DudaError;

/// Which Duda API host to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DudaEnvironment {
    #[default]
    Production,
    Sandbox,
}

impl DudaEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            DudaEnvironment::Production => "https://api.duda.co/api",
            DudaEnvironment::Sandbox => "https://api-sandbox.duda.co/api",
        }
    }
}

impl FromStr for DudaEnvironment {
    type Err = DudaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" | "" => Ok(DudaEnvironment::Production),
            "sandbox" => Ok(DudaEnvironment::Sandbox),
            other => Err(DudaError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// One row of a Dynamic Content Manager collection.
///
/// `page_item_url` becomes the dynamic page's URL segment; `data` keys must
/// match the collection's field names exactly (e.g. "Location Name").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionRow {
    pub page_item_url: String,
    pub data: BTreeMap<String, String>,
}

impl CollectionRow {
    pub fn new(page_item_url: impl Into<String>) -> Self {
        Self {
            page_item_url: page_item_url.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }
}

/// Subset of the site details returned by `/sites/multiscreen/{site}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteInfo {
    pub site_name: String,
    pub site_domain: Option<String>,
    pub publish_status: Option<String>,
}
