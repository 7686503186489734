use std::fmt;

/// Deal status that unlocks page generation.
pub const READY_FOR_PUBLISHED: &str = "Ready for Published";

/// Deal properties read from the CRM.
pub const DEAL_STATUS_PROPERTY: &str = "website_status";
pub const DEAL_SITE_CODE_PROPERTY: &str = "duda_site_code";
pub const DEAL_TYPE_PROPERTY: &str = "dealtype";

pub const DEAL_PROPERTIES: [&str; 3] = [
    DEAL_STATUS_PROPERTY,
    DEAL_SITE_CODE_PROPERTY,
    DEAL_TYPE_PROPERTY,
];

/// CRM deal whose status change triggers page generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub id: String,
    pub status: Option<String>,
    pub site_code: Option<String>,
    pub deal_type: Option<String>,
}

impl Deal {
    pub fn is_ready(&self) -> bool {
        self.status.as_deref() == Some(READY_FOR_PUBLISHED)
    }

    pub fn page_count(&self, default: PageCount) -> PageCount {
        PageCount::from_deal_type(self.deal_type.as_deref(), default)
    }
}

/// Number of pages a deal buys. Always a full package, never partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCount {
    Ten,
    Fifty,
}

impl PageCount {
    pub fn get(self) -> usize {
        match self {
            PageCount::Ten => 10,
            PageCount::Fifty => 50,
        }
    }

    /// Map a CRM deal type to its package size.
    ///
    /// "Power Pages" packages ("Starter Plus Power Pages", "ZING Power Pages / $279")
    /// get 50 pages; "10 Landing Pages" and "Starter Plus $59" get 10; anything
    /// else falls back to `default`.
    pub fn from_deal_type(deal_type: Option<&str>, default: PageCount) -> PageCount {
        let Some(deal_type) = deal_type.map(str::trim).filter(|t| !t.is_empty()) else {
            tracing::info!(pages = default.get(), "No deal type, using default page count");
            return default;
        };

        let lower = deal_type.to_lowercase();
        if lower.contains("power pages") {
            PageCount::Fifty
        } else if lower.contains("10 landing pages") || lower.contains("starter plus $59") {
            PageCount::Ten
        } else {
            tracing::info!(
                deal_type,
                pages = default.get(),
                "Deal type doesn't match a known package, using default page count"
            );
            default
        }
    }
}

impl TryFrom<u32> for PageCount {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(PageCount::Ten),
            50 => Ok(PageCount::Fifty),
            other => Err(other),
        }
    }
}

impl fmt::Display for PageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
