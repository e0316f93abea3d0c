use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{resolve_user_id, UserIdQuery, VerifiedUser};
use crate::errors::AppError;
use crate::keywords::clean_keywords;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub success: bool,
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingKeywordsRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct OnboardingKeywordsResponse {
    pub success: bool,
    pub added: usize,
}

/// GET /api/lead-discovery/keywords
pub async fn handle_list_keywords(
    State(state): State<AppState>,
    verified: Option<Extension<VerifiedUser>>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let user_id = resolve_user_id(verified.as_deref(), params.user_id.as_deref())?;
    let keywords = state.keywords.list(&user_id).await?;
    Ok(Json(KeywordsResponse {
        success: true,
        keywords,
    }))
}

/// POST /api/onboarding/keywords
///
/// Appends the buyer keywords chosen during onboarding. Existing keywords are
/// never rewritten.
pub async fn handle_onboarding_keywords(
    State(state): State<AppState>,
    verified: Option<Extension<VerifiedUser>>,
    Json(req): Json<OnboardingKeywordsRequest>,
) -> Result<Json<OnboardingKeywordsResponse>, AppError> {
    let user_id = resolve_user_id(verified.as_deref(), req.user_id.as_deref())?;
    let keywords = clean_keywords(req.keywords);

    let added = state.keywords.append(&user_id, &keywords).await?;
    info!(user_id = %user_id, added, "stored onboarding keywords");

    Ok(Json(OnboardingKeywordsResponse {
        success: true,
        added,
    }))
}
