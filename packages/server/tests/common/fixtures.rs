//! CRM records shared by the integration tests.

use landing_pages_core::domains::landing_pages::models::{Contact, Deal, READY_FOR_PUBLISHED};
use landing_pages_core::kernel::test_dependencies::MockCrm;

pub const CONTACT_ID: &str = "C1";
pub const DEAL_ID: &str = "D2";
pub const SITE_CODE: &str = "S9";

/// A deal marked "Ready for Published" on site S9.
pub fn ready_deal(id: &str, deal_type: Option<&str>) -> Deal {
    Deal {
        id: id.to_string(),
        status: Some(READY_FOR_PUBLISHED.to_string()),
        site_code: Some(SITE_CODE.to_string()),
        deal_type: deal_type.map(String::from),
    }
}

pub fn deal_with_status(id: &str, status: &str) -> Deal {
    Deal {
        status: Some(status.to_string()),
        ..ready_deal(id, None)
    }
}

/// A plumber in Denver, CO with no manual locations.
pub fn plumber(id: &str) -> Contact {
    Contact {
        id: id.to_string(),
        city: Some("Denver".to_string()),
        state: Some("CO".to_string()),
        industry: Some("Plumbing".to_string()),
        company_name: Some("Mile High Plumbing".to_string()),
        manual_locations: Vec::new(),
    }
}

/// D2 ready on S9 with deal type "small", C1 a Denver plumber associated with it.
pub fn standard_crm() -> MockCrm {
    MockCrm::new()
        .with_deal(ready_deal(DEAL_ID, Some("small")))
        .with_contact(plumber(CONTACT_ID))
        .with_deal_contact(DEAL_ID, CONTACT_ID)
}
