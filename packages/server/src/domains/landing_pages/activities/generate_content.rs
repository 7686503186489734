//! Per-location SEO copy.
//!
//! One chat completion per location, strictly in order with a fixed pause
//! between calls. Replies are cleaned up and checked; a reply that fails the
//! checks is replaced by a template paragraph, while a failed request marks
//! only that location as failed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::common::ServiceResult;
use crate::domains::landing_pages::models::{GeneratedContent, GeneratedPage, PipelineSettings};
use crate::kernel::{BaseAI, CompletionRequest};

pub const CONTENT_SYSTEM_PROMPT: &str = "You are an expert SEO content writer creating location-based service pages. Focus on local SEO, user intent, and natural keyword integration.";

const MIN_CONTENT_CHARS: usize = 50;
const MAX_SENTENCE_FRAGMENTS: usize = 5;
const KEPT_SENTENCES: usize = 4;

static FORMATTING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_#]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static PLACEHOLDERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[.*?\]|INSERT.*?HERE|TODO|Lorem ipsum|Contact us at \d{3}").unwrap()
});

/// Everything the prompt for one location is built from.
#[derive(Debug, Clone, Copy)]
pub struct ContentRequest<'a> {
    pub industry: &'a str,
    pub location: &'a str,
    pub company_name: Option<&'a str>,
    pub tone: &'a str,
    pub length: &'a str,
}

pub fn build_prompt(request: &ContentRequest<'_>) -> String {
    let mut lines = vec![
        format!(
            "Write {} of {} content for a service page about {} in {}.",
            request.length, request.tone, request.industry, request.location
        ),
        "The content should:".to_string(),
        "- Be informative and engaging".to_string(),
        "- Focus on local service benefits".to_string(),
        "- Use natural language that appeals to potential customers".to_string(),
        "- Avoid promotional language or calls-to-action".to_string(),
        "- Be suitable for a paragraph below a heading".to_string(),
        format!(
            "- Naturally incorporate these keywords where appropriate: {}, {}",
            request.industry, request.location
        ),
    ];

    if let Some(company) = request.company_name {
        lines.push(format!(
            "- You may reference {} as the service provider if it fits naturally",
            company
        ));
    }

    lines.push("\nGenerate only the paragraph content, no heading or formatting:".to_string());
    lines.join("\n")
}

/// Strip markdown, flatten whitespace, make sure the industry and location are
/// mentioned, and cap the paragraph at four sentences when it runs long.
pub fn post_process(content: &str, industry: &str, location: &str) -> String {
    let content = FORMATTING.replace_all(content, "");
    let mut content = WHITESPACE.replace_all(&content, " ").trim().to_string();

    if !content.to_lowercase().contains(&industry.to_lowercase()) {
        content = format!(
            "{} Our {} services are designed to meet your specific needs.",
            content, industry
        );
    }

    if !content.to_lowercase().contains(&location.to_lowercase()) {
        content = format!(
            "{} Serving the {} area with dedication and expertise.",
            content, location
        );
    }

    let fragments: Vec<&str> = content.split('.').collect();
    if fragments.len() > MAX_SENTENCE_FRAGMENTS {
        content = format!(
            "{}.",
            fragments[..KEPT_SENTENCES]
                .iter()
                .map(|s| s.trim())
                .collect::<Vec<_>>()
                .join(". ")
        );
    }

    content
}

/// Reject short, unterminated, or placeholder-laden copy.
pub fn validate_content(content: &str) -> bool {
    content.chars().count() >= MIN_CONTENT_CHARS
        && content.ends_with('.')
        && !PLACEHOLDERS.is_match(content)
}

/// Template paragraph used when generated copy does not pass validation.
///
/// The template is picked from the industry and location, so the same page
/// always gets the same fallback.
pub fn fallback_content(industry: &str, location: &str, company_name: Option<&str>) -> String {
    let templates = [
        format!(
            "Finding reliable {industry} in {location} requires expertise and local knowledge. \
             Our experienced professionals understand the unique needs of the {location} area and deliver \
             solutions tailored to your specific requirements. With a commitment to quality and customer \
             satisfaction, we ensure every project meets the highest standards."
        ),
        format!(
            "When it comes to {industry} in {location}, quality and reliability matter most. \
             Our team brings years of experience serving the {location} community with professional \
             services that exceed expectations. We combine industry best practices with local insights \
             to deliver results that last."
        ),
        format!(
            "Professional {industry} services in {location} designed to meet your needs. \
             We understand that every client has unique requirements, which is why we offer customized \
             solutions backed by expertise and dedication. Our {location} team is committed to \
             delivering exceptional results on time and within budget."
        ),
    ];

    let key: usize = industry
        .bytes()
        .chain(location.bytes())
        .map(usize::from)
        .sum();
    let content = templates[key % templates.len()].clone();

    match company_name {
        Some(company) => content
            .replace("Our", &format!("{}'s", company))
            .replace("We ", &format!("At {}, we ", company)),
        None => content,
    }
}

/// Generate copy for one location.
pub async fn generate_content(ai: &dyn BaseAI, request: ContentRequest<'_>) -> ServiceResult<String> {
    let raw = ai
        .complete(
            CompletionRequest::new(CONTENT_SYSTEM_PROMPT, build_prompt(&request))
                .temperature(0.7)
                .max_tokens(150),
        )
        .await?;

    let content = post_process(&raw, request.industry, request.location);
    if validate_content(&content) {
        Ok(content)
    } else {
        warn!(
            location = request.location,
            "Generated content failed validation, using fallback"
        );
        Ok(fallback_content(
            request.industry,
            request.location,
            request.company_name,
        ))
    }
}

/// Generate copy for every location, one request at a time.
pub async fn generate_all(
    ai: &dyn BaseAI,
    settings: &PipelineSettings,
    industry: &str,
    company_name: Option<&str>,
    locations: &[String],
) -> Vec<GeneratedContent> {
    let mut results = Vec::with_capacity(locations.len());

    for (i, location) in locations.iter().enumerate() {
        if i > 0 && !settings.api_call_delay.is_zero() {
            tokio::time::sleep(settings.api_call_delay).await;
        }

        let request = ContentRequest {
            industry,
            location,
            company_name,
            tone: &settings.content_tone,
            length: &settings.content_length,
        };

        match generate_content(ai, request).await {
            Ok(content) => {
                debug!(location = %location, progress = i + 1, total = locations.len(), "Content generated");
                results.push(GeneratedContent::Ready(GeneratedPage {
                    location: location.clone(),
                    content,
                }));
            }
            Err(e) => {
                warn!(location = %location, error = %e, "Content generation failed");
                results.push(GeneratedContent::Failed {
                    location: location.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        total = locations.len(),
        failed = results
            .iter()
            .filter(|r| matches!(r, GeneratedContent::Failed { .. }))
            .count(),
        "Content generation finished"
    );
    results
}
