use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};

use crate::common::ServiceError;
use crate::domains::landing_pages::{handle_deal_event, RunResponse, WebhookPayload};
use crate::server::app::AxumAppState;

/// CRM webhook: process the deal named in the payload.
///
/// Always answers with a [`RunResponse`] body whose `statusCode` matches the
/// HTTP status, including for bodies that are not valid JSON.
pub async fn webhook_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<WebhookPayload>, JsonRejection>,
) -> (StatusCode, Json<RunResponse>) {
    let response = match payload {
        Ok(Json(payload)) => handle_deal_event(payload, &state.server_deps).await,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Malformed webhook body");
            RunResponse::error(&ServiceError::BadRequest(rejection.body_text()))
        }
    };

    (response.status(), Json(response))
}
