use thiserror::Error;

pub type Result<T> = std::result::Result<T, HubSpotError>;

#[derive(Debug, Error)]
pub enum HubSpotError {
    #[error("HubSpot {object} {id} not found")]
    NotFound { object: String, id: String },

    #[error("HubSpot API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HubSpot request failed: {0}")]
    Network(#[from] reqwest::Error),
}
