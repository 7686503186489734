use axum::Json;
use serde::Serialize;

pub const SERVICE_NAME: &str = "landing-page-service";

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

/// Liveness check. The service holds no connections worth probing per request.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
    })
}
