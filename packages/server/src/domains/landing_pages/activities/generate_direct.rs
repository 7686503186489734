//! Direct generation - pages for a site without going through the CRM.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::derive_locations::{derive_locations, normalize_location, LocationRequest};
use super::generate_content::generate_all;
use super::publish_pages::{publish_pages, PublishTarget};
use super::record_run::record_run;
use crate::common::{ServiceError, ServiceResult};
use crate::domains::landing_pages::models::{
    PageNaming, PageResult, PageRun, RunSummary, TRIGGER_DIRECT,
};
use crate::kernel::ServerDeps;

pub const MAX_DIRECT_PAGES: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct DirectGenerateRequest {
    pub site_code: String,
    pub industry: String,
    pub base_location: String,
    #[serde(default = "default_num_pages")]
    pub num_pages: u32,
    #[serde(default = "default_collection")]
    pub collection_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
}

fn default_num_pages() -> u32 {
    50
}

fn default_collection() -> String {
    "Location".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectGenerateResult {
    pub status: &'static str,
    pub pages_created: usize,
    pub failed: usize,
    pub site_code: String,
    /// Titles of the pages that were created, e.g. "Roofing in Golden, CO"
    pub locations: Vec<String>,
    pub pages: Vec<PageResult>,
}

impl DirectGenerateRequest {
    fn validate(&self) -> ServiceResult<()> {
        for (field, value) in [
            ("site_code", &self.site_code),
            ("industry", &self.industry),
            ("base_location", &self.base_location),
        ] {
            if value.trim().is_empty() {
                return Err(ServiceError::missing(field));
            }
        }
        if !(1..=MAX_DIRECT_PAGES).contains(&self.num_pages) {
            return Err(ServiceError::BadRequest(format!(
                "num_pages must be between 1 and {}, got {}",
                MAX_DIRECT_PAGES, self.num_pages
            )));
        }
        Ok(())
    }
}

/// Derive locations around `base_location`, generate copy, create the rows
/// with location-only slugs, and publish the site.
pub async fn generate_direct(
    request: DirectGenerateRequest,
    deps: &ServerDeps,
) -> ServiceResult<DirectGenerateResult> {
    let result = run_direct(&request, deps).await;

    let run = match &result {
        Ok((summary, _)) => PageRun::published(TRIGGER_DIRECT, summary),
        Err(e) => {
            error!(site_code = %request.site_code, error = %e, "Direct generation failed");
            let mut run = PageRun::failed(TRIGGER_DIRECT, None, None, e);
            run.site_code = Some(request.site_code.trim().to_string()).filter(|s| !s.is_empty());
            run
        }
    };
    record_run(deps, &run).await;

    let (summary, locations) = result?;
    Ok(DirectGenerateResult {
        status: if summary.nothing_created() { "failed" } else { "success" },
        pages_created: summary.created,
        failed: summary.failed,
        site_code: summary.site_code,
        locations,
        pages: summary.pages,
    })
}

async fn run_direct(
    request: &DirectGenerateRequest,
    deps: &ServerDeps,
) -> ServiceResult<(RunSummary, Vec<String>)> {
    request.validate()?;

    let site_code = request.site_code.trim();
    let industry = request.industry.trim();
    let base_location = normalize_location(&request.base_location);
    let count = request.num_pages as usize;

    info!(
        site_code,
        industry,
        base_location = %base_location,
        pages = count,
        "Direct landing page generation"
    );

    let locations = derive_locations(
        deps.ai.as_ref(),
        LocationRequest {
            base_city: Some(&base_location),
            count,
            industry,
            priority: &[],
        },
    )
    .await?;

    let contents = generate_all(
        deps.ai.as_ref(),
        &deps.settings,
        industry,
        request.company_name.as_deref(),
        &locations,
    )
    .await;

    let pages = publish_pages(
        deps.publisher.as_ref(),
        &deps.settings,
        PublishTarget {
            site_code,
            collection: request.collection_name.trim(),
            industry,
            naming: PageNaming::Location,
            publish: true,
        },
        contents,
    )
    .await;

    let titles = pages
        .iter()
        .filter(|page| page.is_created())
        .map(|page| PageNaming::Location.title(industry, &page.location))
        .collect();

    let summary = RunSummary::new(None, None, site_code.to_string(), count, pages);
    Ok((summary, titles))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let request: DirectGenerateRequest = serde_json::from_str(
            r#"{"site_code": "S9", "industry": "Plumbing", "base_location": "Denver, CO"}"#,
        )
        .unwrap();
        assert_eq!(request.num_pages, 50);
        assert_eq!(request.collection_name, "Location");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn page_count_is_bounded() {
        let mut request: DirectGenerateRequest = serde_json::from_str(
            r#"{"site_code": "S9", "industry": "Plumbing", "base_location": "Denver, CO", "num_pages": 0}"#,
        )
        .unwrap();
        assert!(matches!(request.validate(), Err(ServiceError::BadRequest(_))));

        request.num_pages = 101;
        assert!(matches!(request.validate(), Err(ServiceError::BadRequest(_))));

        request.num_pages = 100;
        request.industry = " ".into();
        assert!(matches!(request.validate(), Err(ServiceError::MissingField(ref f)) if f == "industry"));
    }
}
