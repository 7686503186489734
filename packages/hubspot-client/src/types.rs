use std::collections::HashMap;

use serde::Deserialize;

/// A CRM object (deal, contact, company) as returned by `/crm/v3/objects`.
///
/// HubSpot sends unset properties as `null`, so every value is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct CrmObject {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Option<String>>,
}

impl CrmObject {
    /// Trimmed, non-empty property value.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .and_then(|v| v.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Property value exactly as stored.
    pub fn raw_property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(|v| v.as_deref())
    }
}

/// Response of the v3 associations endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AssociationList {
    #[serde(default)]
    pub results: Vec<Association>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Association {
    pub id: String,
    #[serde(rename = "type")]
    pub association_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_blank_properties_read_as_missing() {
        let deal: CrmObject = serde_json::from_str(
            r#"{
                "id": "D2",
                "properties": {
                    "website_status": "Ready for Published",
                    "duda_site_code": null,
                    "dealtype": "   "
                }
            }"#,
        )
        .unwrap();

        assert_eq!(deal.property("website_status"), Some("Ready for Published"));
        assert_eq!(deal.property("duda_site_code"), None);
        assert_eq!(deal.property("dealtype"), None);
        assert_eq!(deal.property("unknown"), None);
        assert_eq!(deal.raw_property("dealtype"), Some("   "));
        assert_eq!(deal.raw_property("duda_site_code"), None);
    }

    #[test]
    fn associations_keep_order() {
        let list: AssociationList = serde_json::from_str(
            r#"{"results":[{"id":"C1","type":"deal_to_contact"},{"id":"C7","type":"deal_to_contact"}]}"#,
        )
        .unwrap();

        let ids: Vec<&str> = list.results.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C7"]);
    }
}
