use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Serialize;
use tracing::info;

use crate::auth::{resolve_user_id, UserIdQuery, VerifiedUser};
use crate::errors::AppError;
use crate::ledger::get_balance;
use crate::models::user::{NewUser, STARTING_CREDITS};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub success: bool,
    pub credits: u32,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
}

/// GET /api/lead-discovery/user/credits
pub async fn handle_get_credits(
    State(state): State<AppState>,
    verified: Option<Extension<VerifiedUser>>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<CreditsResponse>, AppError> {
    let user_id = resolve_user_id(verified.as_deref(), params.user_id.as_deref())?;
    let balance = get_balance(state.ledger.as_ref(), &user_id).await?;
    Ok(Json(CreditsResponse {
        success: true,
        credits: balance.credits,
    }))
}

/// POST /api/users/sync
///
/// Provisions the ledger row for a newly signed-in user. Existing users keep
/// their balance.
pub async fn handle_sync_user(
    State(state): State<AppState>,
    verified: Option<Extension<VerifiedUser>>,
    Json(req): Json<NewUser>,
) -> Result<Json<SyncResponse>, AppError> {
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("Missing data".to_string()))?;
    let user_id = resolve_user_id(verified.as_deref(), req.clerk_id.as_deref())
        .map_err(|e| match e {
            AppError::Validation(_) => AppError::Validation("Missing data".to_string()),
            other => other,
        })?;

    let created = state
        .ledger
        .ensure_account(&user_id, email, req.name.as_deref(), STARTING_CREDITS)
        .await?;
    if created {
        info!(user_id = %user_id, credits = STARTING_CREDITS, "provisioned ledger row");
    }

    Ok(Json(SyncResponse { success: true }))
}
