use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::auth::{resolve_user_id, UserIdQuery, VerifiedUser};
use crate::errors::AppError;
use crate::presentation::dashboard::DashboardView;
use crate::state::AppState;

/// GET /api/lead-discovery/dashboard
///
/// Credits, the credit banner and the user's leads in one read. Lead source
/// failures degrade to the last known leads instead of an error.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    verified: Option<Extension<VerifiedUser>>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let user_id = resolve_user_id(verified.as_deref(), params.user_id.as_deref())?;
    let bearer = verified.as_ref().map(|v| v.token.as_str());
    let view = state.dashboard.refresh(&user_id, bearer).await?;
    Ok(Json(view))
}
