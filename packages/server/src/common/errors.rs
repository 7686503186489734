use axum::http::StatusCode;
use thiserror::Error;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Failures that end a page-generation run.
///
/// A deal that is not ready is not an error; it is reported as a skipped run.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ServiceError {
    pub fn missing(field: impl Into<String>) -> Self {
        ServiceError::MissingField(field.into())
    }

    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Upstream {
            service,
            status: None,
            message: message.into(),
        }
    }

    /// HTTP status reported to the webhook caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MissingField(_) | ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short machine-readable kind, stored with the run log.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::MissingField(_) => "missing_field",
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::Upstream { .. } => "upstream_failure",
            ServiceError::BadRequest(_) => "bad_request",
        }
    }
}
