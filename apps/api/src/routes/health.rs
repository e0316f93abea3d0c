use axum::Json;
use serde::Serialize;

pub const SERVICE_NAME: &str = "leadequator-api";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET / and GET /health
///
/// Liveness only; no dependency is checked.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Backend running",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}
