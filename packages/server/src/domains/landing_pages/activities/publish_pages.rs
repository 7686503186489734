//! Push generated pages into the site's dynamic content collection.

use tracing::{info, warn};

use crate::domains::landing_pages::models::{
    GeneratedContent, PageNaming, PageResult, PageRow, PipelineSettings,
};
use crate::kernel::BasePagePublisher;

/// Where a batch of pages goes.
#[derive(Debug, Clone, Copy)]
pub struct PublishTarget<'a> {
    pub site_code: &'a str,
    pub collection: &'a str,
    pub industry: &'a str,
    pub naming: PageNaming,
    /// Publish the live site after the rows land. Only direct runs do this.
    pub publish: bool,
}

/// Create one collection row per generated page and report each page's outcome,
/// in the order the contents were given.
///
/// Rows go out in batches of `settings.batch_size`; a rejected batch fails only
/// its own pages. When `target.publish` is set (and `settings.publish_site`
/// allows it) the site is published afterwards if at least one row landed.
pub async fn publish_pages(
    publisher: &dyn BasePagePublisher,
    settings: &PipelineSettings,
    target: PublishTarget<'_>,
    contents: Vec<GeneratedContent>,
) -> Vec<PageResult> {
    let mut results = Vec::with_capacity(contents.len());
    let mut rows = Vec::new();
    let mut row_slots = Vec::new();

    for content in contents {
        match content {
            GeneratedContent::Ready(page) => {
                let row = PageRow::new(target.naming, target.industry, &page);
                row_slots.push(results.len());
                results.push(PageResult::created(&row));
                rows.push(row);
            }
            GeneratedContent::Failed { location, reason } => {
                results.push(PageResult::failed(location, None, reason));
            }
        }
    }

    let batch_size = settings.batch_size.max(1);
    for (batch, slots) in rows.chunks(batch_size).zip(row_slots.chunks(batch_size)) {
        match publisher
            .create_rows(target.site_code, target.collection, batch)
            .await
        {
            Ok(()) => info!(
                site_code = target.site_code,
                collection = target.collection,
                rows = batch.len(),
                "Collection rows created"
            ),
            Err(e) => {
                warn!(
                    site_code = target.site_code,
                    rows = batch.len(),
                    error = %e,
                    "Failed to create collection rows"
                );
                for (row, &slot) in batch.iter().zip(slots) {
                    results[slot] =
                        PageResult::failed(row.location.clone(), Some(row.slug.clone()), e.to_string());
                }
            }
        }
    }

    if target.publish && settings.publish_site && results.iter().any(PageResult::is_created) {
        match publisher.publish_site(target.site_code).await {
            Ok(()) => info!(site_code = target.site_code, "Site published"),
            Err(e) => warn!(
                site_code = target.site_code,
                error = %e,
                "Rows were created but the site could not be published"
            ),
        }
    }

    results
}
