use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::QueryError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No buyer keywords configured")]
    NoKeywordsConfigured,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Audit write failed: {0}")]
    AuditWriteFailed(#[source] QueryError),

    /// An awaited scrape run failed; the message is returned to the caller.
    #[error("Scrape run failed: {0}")]
    ScrapeFailed(String),

    #[error("Lead aggregation failed: {0}")]
    AggregationFailed(String),

    #[error("Upstream transport error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(#[from] QueryError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn missing_user_id() -> Self {
        AppError::Validation("Missing userId".to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(QueryError::Sqlx(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::NoKeywordsConfigured => (
                StatusCode::BAD_REQUEST,
                "NO_KEYWORDS_CONFIGURED",
                "No buyer keywords found".to_string(),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::AuditWriteFailed(e) => {
                tracing::error!("Audit write failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AUDIT_WRITE_FAILED",
                    "Reddit scraping failed".to_string(),
                )
            }
            AppError::ScrapeFailed(msg) => {
                tracing::error!("Scrape run failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SCRAPE_FAILED",
                    msg.clone(),
                )
            }
            AppError::AggregationFailed(msg) => {
                tracing::warn!("Lead aggregation failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AGGREGATION_FAILED",
                    "Leads unavailable, try again".to_string(),
                )
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "An upstream service is unavailable".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
