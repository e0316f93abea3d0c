use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::{resolve_user_id, VerifiedUser};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub force_login: bool,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub success: bool,
    pub message: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoraRunResponse {
    pub success: bool,
    pub ai_result: Value,
}

#[derive(Debug, Serialize)]
pub struct RunAllResponse {
    pub success: bool,
    pub message: String,
    pub failed: Vec<String>,
}

/// POST /api/lead-discovery/reddit/run
pub async fn handle_reddit_run(
    State(state): State<AppState>,
    verified: Option<Extension<VerifiedUser>>,
    Json(req): Json<RunRequest>,
) -> Result<Json<RunResponse>, AppError> {
    let user_id = resolve_user_id(verified.as_deref(), req.user_id.as_deref())?;
    let outcome = state.trigger.trigger(&user_id, req.force_login).await?;

    Ok(Json(RunResponse {
        success: true,
        message: "Reddit scraping triggered successfully".to_string(),
        keywords: outcome.keywords,
    }))
}

/// POST /api/lead-discovery/quora/run
///
/// Waits for the scraping service and relays its reply.
pub async fn handle_quora_run(
    State(state): State<AppState>,
    verified: Option<Extension<VerifiedUser>>,
    Json(req): Json<RunRequest>,
) -> Result<Json<QuoraRunResponse>, AppError> {
    let user_id = resolve_user_id(verified.as_deref(), req.user_id.as_deref())?;
    let outcome = state.trigger.run_quora(&user_id, req.force_login).await?;

    Ok(Json(QuoraRunResponse {
        success: true,
        ai_result: outcome.ai_result,
    }))
}

/// POST /api/lead-discovery/run
pub async fn handle_run_all(
    State(state): State<AppState>,
    verified: Option<Extension<VerifiedUser>>,
    Json(req): Json<RunRequest>,
) -> Result<Json<RunAllResponse>, AppError> {
    let user_id = resolve_user_id(verified.as_deref(), req.user_id.as_deref())?;
    let outcome = state.trigger.run_all(&user_id, req.force_login).await?;

    Ok(Json(RunAllResponse {
        success: true,
        message: "Reddit and Quora scraping completed".to_string(),
        failed: outcome.failed,
    }))
}
