use thiserror::Error;

pub type Result<T> = std::result::Result<T, DudaError>;

#[derive(Debug, Error)]
pub enum DudaError {
    #[error("Duda resource not found: {0}")]
    NotFound(String),

    #[error("Duda API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Duda request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unknown Duda environment: {0}")]
    UnknownEnvironment(String),
}
