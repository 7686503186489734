//! Location derivation - the list of "City, ST" targets one run generates pages for.
//!
//! Manually entered locations come first. The rest are asked from the LLM as a
//! JSON array of places around the contact's base city, with one top-up request
//! when de-duplication leaves the list short. The result always has exactly the
//! requested length; a short list is an error, never a partial run.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::common::{ServiceError, ServiceResult};
use crate::kernel::{BaseAI, CompletionRequest};

pub const LOCATION_SYSTEM_PROMPT: &str = "You are a geographic expert that generates comprehensive lists of unique locations. You have extensive knowledge of cities, towns, neighborhoods, suburbs, and communities across the United States. You NEVER return duplicate locations.";

pub const TOP_UP_SYSTEM_PROMPT: &str =
    "Generate unique locations not in the existing list.";

/// How many already-chosen locations the top-up prompt lists.
const TOP_UP_EXCLUDE_LIMIT: usize = 20;

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?\s*\n?").unwrap());
static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n?```\s*$").unwrap());

/// Inputs of one derivation.
#[derive(Debug, Clone, Copy)]
pub struct LocationRequest<'a> {
    /// "City, ST" origin; only needed when the priority list is short.
    pub base_city: Option<&'a str>,
    pub count: usize,
    pub industry: &'a str,
    pub priority: &'a [String],
}

/// Derive exactly `request.count` unique locations.
pub async fn derive_locations(
    ai: &dyn BaseAI,
    request: LocationRequest<'_>,
) -> ServiceResult<Vec<String>> {
    let mut locations = normalize_priorities(request.priority);

    if locations.len() >= request.count {
        info!(
            priority = locations.len(),
            count = request.count,
            "Priority locations fill every slot, skipping location generation"
        );
        locations.truncate(request.count);
        return Ok(locations);
    }

    let base_city = request
        .base_city
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ServiceError::missing("city/state"))?;

    let remaining = request.count - locations.len();
    let request_count = (remaining + 20).min(remaining * 2);

    info!(
        base_city,
        industry = request.industry,
        remaining,
        request_count,
        priority = locations.len(),
        "Generating nearby locations"
    );

    let raw = ai
        .complete(
            CompletionRequest::new(
                LOCATION_SYSTEM_PROMPT,
                location_prompt(base_city, request_count, &locations),
            )
            .temperature(0.5)
            .max_tokens(4000),
        )
        .await?;

    let mut seen: HashSet<String> = locations.iter().map(|l| l.to_lowercase()).collect();
    let mut generated = dedup_into(&mut seen, parse_location_list(&raw)?);

    if generated.len() < remaining {
        let needed = remaining - generated.len();
        warn!(
            got = generated.len(),
            needed, "Not enough unique locations, requesting more"
        );

        let existing: Vec<String> = locations.iter().chain(generated.iter()).cloned().collect();
        match top_up(ai, base_city, needed, &existing).await {
            Ok(more) => generated.extend(dedup_into(&mut seen, more).into_iter().take(needed)),
            Err(e) => warn!(error = %e, "Additional location request failed"),
        }
    }

    let priority_count = locations.len();
    locations.extend(generated);
    locations.truncate(request.count);

    if locations.len() < request.count {
        return Err(ServiceError::upstream(
            "OpenAI",
            format!(
                "Only found {} unique locations near {}, need {}",
                locations.len(),
                base_city,
                request.count
            ),
        ));
    }

    info!(
        count = locations.len(),
        priority = priority_count,
        sample = ?&locations[..locations.len().min(5)],
        "Locations derived"
    );
    Ok(locations)
}

async fn top_up(
    ai: &dyn BaseAI,
    base_city: &str,
    needed: usize,
    existing: &[String],
) -> ServiceResult<Vec<String>> {
    let shown = existing
        .iter()
        .take(TOP_UP_EXCLUDE_LIMIT)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    let prompt = format!(
        r#"I need {needed} MORE unique locations near {base_city}.

ALREADY HAVE (do NOT repeat these): {shown}

Generate {needed} DIFFERENT locations I don't have yet. Include:
- Neighborhoods within cities (e.g., "Midtown Atlanta, GA")
- Small communities and CDPs
- Extend radius up to 100 miles if needed

Return ONLY a JSON array: ["Location1, ST", "Location2, ST", ...]"#
    );

    let raw = ai
        .complete(
            CompletionRequest::new(TOP_UP_SYSTEM_PROMPT, prompt)
                .temperature(0.6)
                .max_tokens(2000),
        )
        .await?;
    parse_location_list(&raw)
}

fn location_prompt(base_city: &str, request_count: usize, priorities: &[String]) -> String {
    let exclude = if priorities.is_empty() {
        String::new()
    } else {
        format!(
            "\n5. Do NOT include any of these already-selected locations: {}",
            priorities.join(", ")
        )
    };
    let city_name = base_city.split(',').next().unwrap_or(base_city).trim();

    format!(
        r#"Generate a list of exactly {request_count} UNIQUE nearby locations around {base_city}.

CRITICAL REQUIREMENTS:
1. EVERY location must be UNIQUE - no duplicates allowed
2. Each location must be a real, verifiable place
3. Include the state abbreviation (e.g., "Boulder, CO" not just "Boulder")
4. Do NOT include {base_city} itself{exclude}

LOCATION PRIORITY (use this order to fill the list):
1. First: Cities and towns within 30 miles of {base_city}
2. Then: Suburbs and unincorporated communities within 45 miles
3. Then: Neighborhoods and districts within {base_city} metro area (e.g., "Westside San Antonio, TX", "North Austin, TX")
4. Then: Cities and towns within 60 miles
5. If still needed: Extend to 75 miles to ensure {request_count} unique locations

For rural areas with few nearby cities, include:
- Named neighborhoods (e.g., "Downtown {city_name}")
- Nearby unincorporated communities
- Census-designated places (CDPs)
- Well-known subdivisions or areas

FORMAT: Return ONLY a valid JSON array, no explanations:
["City1, ST", "City2, ST", "Neighborhood Name, ST", ...]

VERIFY before responding:
- All {request_count} locations are UNIQUE
- No location appears twice
- All locations are real places"#
    )
}

/// Parse an LLM reply that should be a JSON array of strings, tolerating a
/// markdown code fence around it.
pub fn parse_location_list(raw: &str) -> ServiceResult<Vec<String>> {
    let text = strip_code_fences(raw);
    serde_json::from_str::<Vec<String>>(&text).map_err(|e| {
        warn!(response = %text, "Location list is not a JSON array of strings");
        ServiceError::upstream("OpenAI", format!("Failed to parse location list: {}", e))
    })
}

fn strip_code_fences(raw: &str) -> String {
    let text = raw.trim();
    if !text.starts_with("```") {
        return text.to_string();
    }
    let text = OPENING_FENCE.replace(text, "");
    CLOSING_FENCE.replace(&text, "").trim().to_string()
}

/// Keep the first occurrence of each location (case-insensitive, trimmed),
/// skipping anything already in `seen`.
fn dedup_into(seen: &mut HashSet<String>, candidates: Vec<String>) -> Vec<String> {
    candidates
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty() && seen.insert(c.to_lowercase()))
        .collect()
}

fn normalize_priorities(priority: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    priority
        .iter()
        .map(|l| normalize_location(l))
        .filter(|l| !l.is_empty() && seen.insert(l.to_lowercase()))
        .collect()
}

/// Normalize a hand-typed location to "City Name, ST".
///
/// "denver co" and " denver, co " both become "Denver, CO"; a state longer than
/// two characters is title-cased instead ("castle rock, colorado" → "Castle Rock, Colorado").
pub fn normalize_location(raw: &str) -> String {
    let loc = raw.trim();
    if loc.is_empty() {
        return String::new();
    }

    let (city, state) = match loc.split_once(',') {
        Some((city, state)) => (city.trim(), state.trim()),
        None => match loc.rsplit_once(char::is_whitespace) {
            Some((city, state)) => (city.trim(), state.trim()),
            None => return title_case(loc),
        },
    };

    if state.is_empty() {
        return title_case(city);
    }

    let state = if state.chars().count() <= 2 {
        state.to_uppercase()
    } else {
        title_case(state)
    };
    format!("{}, {}", title_case(city), state)
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
