use serde::Serialize;

/// Copy generated for one target location.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub location: String,
    pub content: String,
}

/// Result of asking the content generator about one location.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedContent {
    Ready(GeneratedPage),
    Failed { location: String, reason: String },
}

/// How pages of a run are named in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNaming {
    /// `best-plumbing-boulder-co` / "Best Plumbing in Boulder, CO" (deal runs)
    BestOf,
    /// `boulder-co` / "Plumbing in Boulder, CO" (direct runs)
    Location,
}

impl PageNaming {
    pub fn slug(self, industry: &str, location: &str) -> String {
        match self {
            PageNaming::BestOf => slugify(&format!("best {} {}", industry, location)),
            PageNaming::Location => slugify(location),
        }
    }

    pub fn title(self, industry: &str, location: &str) -> String {
        match self {
            PageNaming::BestOf => format!("Best {} in {}", industry.trim(), location),
            PageNaming::Location => format!("{} in {}", industry.trim(), location),
        }
    }
}

/// A landing page as it is written to the CMS collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRow {
    pub location: String,
    /// URL segment, see [`PageNaming`]
    pub slug: String,
    pub title: String,
    pub description: String,
}

impl PageRow {
    pub fn new(naming: PageNaming, industry: &str, page: &GeneratedPage) -> Self {
        Self {
            location: page.location.clone(),
            slug: naming.slug(industry, &page.location),
            title: naming.title(industry, &page.location),
            description: page.content.clone(),
        }
    }
}

/// Lowercase, hyphen-separated URL segment with only alphanumerics and single hyphens.
pub fn slugify(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .replace(", ", "-")
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect();

    cleaned
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Per-page outcome reported back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub status: PageStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageStatus {
    Created,
    Failed { error: String },
}

impl PageResult {
    pub fn created(row: &PageRow) -> Self {
        Self {
            location: row.location.clone(),
            slug: Some(row.slug.clone()),
            status: PageStatus::Created,
        }
    }

    pub fn failed(location: impl Into<String>, slug: Option<String>, error: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            slug,
            status: PageStatus::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self.status, PageStatus::Created)
    }
}
