use serde::{Deserialize, Deserializer};

use crate::common::{ServiceError, ServiceResult};

/// Webhook body: HubSpot posts an array of events, other callers a single object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    Batch(Vec<WebhookEvent>),
    Single(WebhookEvent),
}

/// One inbound event. Callers may pass contact/deal ids directly or a raw
/// HubSpot `objectId` + `subscriptionType`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "objectId", default, deserialize_with = "id_string")]
    pub object_id: Option<String>,
    #[serde(rename = "subscriptionType", default)]
    pub subscription_type: Option<String>,
    #[serde(alias = "contactId", default, deserialize_with = "id_string")]
    pub contact_id: Option<String>,
    #[serde(alias = "dealId", default, deserialize_with = "id_string")]
    pub deal_id: Option<String>,
}

/// The deal to process, and the contact if the caller already knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealTrigger {
    pub deal_id: String,
    pub contact_id: Option<String>,
}

impl WebhookPayload {
    /// First event of the payload; later events in a batch are ignored.
    pub fn first_event(self) -> ServiceResult<WebhookEvent> {
        match self {
            WebhookPayload::Single(event) => Ok(event),
            WebhookPayload::Batch(events) => events
                .into_iter()
                .next()
                .ok_or_else(|| ServiceError::BadRequest("Empty event list".into())),
        }
    }
}

impl WebhookEvent {
    fn is_deal_event(&self) -> bool {
        self.subscription_type
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains("deal"))
    }

    /// Resolve which deal this event is about.
    ///
    /// The deal id always comes from the payload. A contact-only event is
    /// rejected instead of guessing among the contact's deals.
    pub fn into_trigger(self) -> ServiceResult<DealTrigger> {
        let is_deal_event = self.is_deal_event();

        if let Some(deal_id) = self.deal_id {
            return Ok(DealTrigger {
                deal_id,
                contact_id: self.contact_id,
            });
        }

        match self.object_id {
            Some(object_id) if is_deal_event => Ok(DealTrigger {
                deal_id: object_id,
                contact_id: self.contact_id,
            }),
            Some(_) => Err(ServiceError::missing("deal_id")),
            None if self.contact_id.is_some() => Err(ServiceError::missing("deal_id")),
            None => Err(ServiceError::BadRequest(
                "No objectId, deal_id or contact_id provided".into(),
            )),
        }
    }
}

/// HubSpot sends ids as numbers, other callers as strings.
fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
