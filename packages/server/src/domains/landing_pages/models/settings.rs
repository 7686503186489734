use std::time::Duration;

use super::deal::PageCount;
use crate::config::Config;

/// Knobs of the page-generation pipeline, built once from [`Config`] and
/// passed to every activity through `ServerDeps`.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub content_tone: String,
    pub content_length: String,
    pub default_page_count: PageCount,
    /// Pause between consecutive content generation calls.
    pub api_call_delay: Duration,
    pub collection: String,
    pub batch_size: usize,
    pub publish_site: bool,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            content_tone: config.content_tone.clone(),
            content_length: config.content_length.clone(),
            default_page_count: config.default_page_count,
            api_call_delay: config.api_call_delay,
            collection: config.duda_collection.clone(),
            batch_size: config.duda_batch_size,
            publish_site: config.duda_publish_site,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            content_tone: "professional".to_string(),
            content_length: "3-4 sentences".to_string(),
            default_page_count: PageCount::Ten,
            api_call_delay: Duration::from_millis(500),
            collection: "Location".to_string(),
            batch_size: 50,
            publish_site: true,
        }
    }
}
