/// Manually entered locations live in `location_1` … `location_100`.
pub const MAX_MANUAL_LOCATIONS: usize = 100;

pub const CONTACT_INDUSTRY_PROPERTY: &str = "industry_1";
pub const CONTACT_COMPANY_PROPERTY: &str = "company_name";
pub const CONTACT_CITY_PROPERTY: &str = "city";
pub const CONTACT_STATE_PROPERTY: &str = "state";

/// Contact the pages are generated for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub id: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub industry: Option<String>,
    pub company_name: Option<String>,
    /// Locations typed into the CRM by hand, in field order.
    pub manual_locations: Vec<String>,
}

impl Contact {
    /// CRM properties to request for a contact.
    pub fn properties() -> Vec<String> {
        let mut props: Vec<String> = [
            CONTACT_INDUSTRY_PROPERTY,
            CONTACT_COMPANY_PROPERTY,
            CONTACT_CITY_PROPERTY,
            CONTACT_STATE_PROPERTY,
        ]
        .iter()
        .map(|p| p.to_string())
        .collect();
        props.extend(manual_location_properties());
        props
    }

    /// "City, ST" origin for nearby-location generation, when both parts are known.
    pub fn base_city(&self) -> Option<String> {
        match (self.city.as_deref(), self.state.as_deref()) {
            (Some(city), Some(state)) => Some(format!("{}, {}", city.trim(), state.trim())),
            _ => None,
        }
    }
}

pub fn manual_location_properties() -> impl Iterator<Item = String> {
    (1..=MAX_MANUAL_LOCATIONS).map(|i| format!("location_{}", i))
}
