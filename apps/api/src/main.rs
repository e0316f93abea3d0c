mod ai_service;
mod auth;
mod config;
mod db;
mod errors;
mod keywords;
mod leads;
mod ledger;
mod models;
mod presentation;
mod routes;
mod state;
mod trigger;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_service::AiServiceClient;
use crate::auth::{AuthState, RemoteTokenVerifier};
use crate::config::Config;
use crate::db::create_pool;
use crate::keywords::store::PgKeywordStore;
use crate::leads::aggregator::LeadAggregator;
use crate::leads::posts::PgPostStore;
use crate::leads::sources::{HttpLeadSource, LeadSource};
use crate::leads::Platform;
use crate::ledger::store::PgCreditLedger;
use crate::presentation::dashboard::Dashboard;
use crate::presentation::feed_cache::FeedCache;
use crate::routes::build_router;
use crate::state::AppState;
use crate::trigger::audit::PgAuditLog;
use crate::trigger::ScrapeTrigger;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Leadequator API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let timeout = config.outbound_timeout;
    let db = create_pool(&config.database_url, config.db_max_connections, timeout).await?;

    let keywords = Arc::new(PgKeywordStore::new(db.clone(), timeout));
    let ledger = Arc::new(PgCreditLedger::new(db.clone(), timeout));
    let posts = Arc::new(PgPostStore::new(db.clone(), timeout));
    let audit = Arc::new(PgAuditLog::new(db, timeout));

    // Scraping service receives fire-and-forget run requests
    let ai_service = Arc::new(AiServiceClient::new(config.ai_service_url.clone(), timeout)?);
    info!("AI service client initialized ({})", config.ai_service_url);
    let trigger = ScrapeTrigger::new(keywords.clone(), audit, ai_service);

    // Lead sources, merged in this order
    let sources: Vec<Arc<dyn LeadSource>> = vec![
        Arc::new(HttpLeadSource::new(
            Platform::Reddit,
            config.lead_source_base_url.clone(),
            timeout,
        )?),
        Arc::new(HttpLeadSource::new(
            Platform::Quora,
            config.lead_source_base_url.clone(),
            timeout,
        )?),
    ];
    let aggregator = LeadAggregator::new(sources);
    info!(
        "Lead sources {:?} reading from {}",
        aggregator.platforms(),
        config.lead_source_base_url
    );
    let feeds = FeedCache::new(config.feed_cache_capacity, config.feed_idle_ttl);
    let dashboard = Dashboard::new(ledger.clone(), aggregator, feeds);

    let auth = match &config.auth_verify_url {
        Some(url) => {
            info!("Bearer auth enabled (verifier: {url})");
            AuthState::enabled(Arc::new(RemoteTokenVerifier::new(url.clone(), timeout)?))
        }
        None => AuthState::disabled(),
    };

    // Build app state
    let state = AppState {
        keywords,
        ledger,
        posts,
        trigger,
        dashboard,
    };

    // Build router
    let app = build_router(state, auth)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
