use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::presentation::feed_cache::{DEFAULT_FEED_CAPACITY, DEFAULT_FEED_IDLE_TTL};

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_OUTBOUND_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Base URL of the external scraping/AI service (`POST {url}/reddit/run`).
    pub ai_service_url: String,
    /// Base URL the lead aggregator reads `/reddit/posts` and `/quora/posts` from.
    pub lead_source_base_url: String,
    /// Token verification endpoint. `None` disables bearer auth (development only).
    pub auth_verify_url: Option<String>,
    pub outbound_timeout: Duration,
    /// Most dashboard feeds kept in memory at once.
    pub feed_cache_capacity: usize,
    /// A feed untouched for this long is dropped.
    pub feed_idle_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let auth_verify_url = optional_env("AUTH_VERIFY_URL");
        let is_development = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("development"))
            .unwrap_or(false);
        if auth_verify_url.is_none() && !is_development {
            bail!("AUTH_VERIFY_URL is required unless APP_ENV=development");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            ai_service_url: trim_base(require_env("AI_SERVICE_URL")?),
            lead_source_base_url: optional_env("LEAD_SOURCE_BASE_URL")
                .map(trim_base)
                .unwrap_or_else(|| format!("http://127.0.0.1:{port}/api/lead-discovery")),
            auth_verify_url,
            outbound_timeout: Duration::from_secs(parse_env(
                "OUTBOUND_TIMEOUT_SECS",
                DEFAULT_OUTBOUND_TIMEOUT_SECS,
            )?),
            feed_cache_capacity: parse_env("FEED_CACHE_CAPACITY", DEFAULT_FEED_CAPACITY)?,
            feed_idle_ttl: Duration::from_secs(parse_env(
                "FEED_IDLE_TTL_SECS",
                DEFAULT_FEED_IDLE_TTL.as_secs(),
            )?),
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
