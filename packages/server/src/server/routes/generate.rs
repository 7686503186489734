use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::common::ServiceError;
use crate::domains::landing_pages::{generate_direct, DirectGenerateRequest};
use crate::server::app::AxumAppState;

/// Direct generation for a site code, industry and base location.
pub async fn generate_handler(
    Extension(state): Extension<AxumAppState>,
    request: Result<Json<DirectGenerateRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_response(&ServiceError::BadRequest(rejection.body_text()));
        }
    };

    match generate_direct(request, &state.server_deps).await {
        Ok(result) => {
            let status = if result.pages_created == 0 && result.failed > 0 {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::OK
            };
            (status, Json(json!(result)))
        }
        Err(e) => error_response(&e),
    }
}

fn error_response(e: &ServiceError) -> (StatusCode, Json<Value>) {
    (
        e.status_code(),
        Json(json!({ "status": "error", "error": e.to_string() })),
    )
}
