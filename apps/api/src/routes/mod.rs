pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::{require_auth, AuthState};
use crate::keywords::handlers as keywords;
use crate::leads::handlers as leads;
use crate::ledger::handlers as ledger;
use crate::presentation::handlers as presentation;
use crate::state::AppState;
use crate::trigger::handlers as trigger;

pub fn build_router(state: AppState, auth: AuthState) -> Router {
    let protected = Router::new()
        // Lead discovery API
        .route(
            "/api/lead-discovery/user/credits",
            get(ledger::handle_get_credits),
        )
        .route(
            "/api/lead-discovery/keywords",
            get(keywords::handle_list_keywords),
        )
        .route(
            "/api/lead-discovery/reddit/run",
            post(trigger::handle_reddit_run),
        )
        .route(
            "/api/lead-discovery/quora/run",
            post(trigger::handle_quora_run),
        )
        .route("/api/lead-discovery/run", post(trigger::handle_run_all))
        .route(
            "/api/lead-discovery/reddit/posts",
            get(leads::handle_reddit_posts),
        )
        .route(
            "/api/lead-discovery/quora/posts",
            get(leads::handle_quora_posts),
        )
        .route(
            "/api/lead-discovery/dashboard",
            get(presentation::handle_dashboard),
        )
        // Account & onboarding
        .route("/api/users/sync", post(ledger::handle_sync_user))
        .route(
            "/api/onboarding/keywords",
            post(keywords::handle_onboarding_keywords),
        )
        .layer(middleware::from_fn_with_state(auth, require_auth));

    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        .merge(protected)
        .with_state(state)
}
