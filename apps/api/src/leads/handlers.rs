use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Serialize;

use crate::auth::{resolve_user_id, UserIdQuery, VerifiedUser};
use crate::errors::AppError;
use crate::models::post::{QuoraPost, RedditPost};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PostsResponse<T: Serialize> {
    pub success: bool,
    pub posts: Vec<T>,
}

/// GET /api/lead-discovery/reddit/posts
pub async fn handle_reddit_posts(
    State(state): State<AppState>,
    verified: Option<Extension<VerifiedUser>>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<PostsResponse<RedditPost>>, AppError> {
    let user_id = resolve_user_id(verified.as_deref(), params.user_id.as_deref())?;
    let posts = state.posts.reddit_posts(&user_id).await?;
    Ok(Json(PostsResponse {
        success: true,
        posts,
    }))
}

/// GET /api/lead-discovery/quora/posts
pub async fn handle_quora_posts(
    State(state): State<AppState>,
    verified: Option<Extension<VerifiedUser>>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<PostsResponse<QuoraPost>>, AppError> {
    let user_id = resolve_user_id(verified.as_deref(), params.user_id.as_deref())?;
    let posts = state.posts.quora_posts(&user_id).await?;
    Ok(Json(PostsResponse {
        success: true,
        posts,
    }))
}
