use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Placeholder URL written with every audit row. Never updated afterwards.
pub const PENDING_URL: &str = "pending";
pub const SYSTEM_AUTHOR: &str = "system";

/// One row per keyword per trigger invocation: "this keyword was submitted for
/// scraping", independent of whether the scrape ever happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeAuditRecord {
    pub user_id: String,
    pub platform: String,
    pub text: String,
    pub url: String,
    pub author: String,
    pub dispatch_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ScrapeAuditRecord {
    pub fn pending(
        user_id: &str,
        platform: &str,
        keyword: &str,
        dispatch_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            platform: platform.to_string(),
            text: keyword.to_string(),
            url: PENDING_URL.to_string(),
            author: SYSTEM_AUTHOR.to_string(),
            dispatch_id,
            created_at,
        }
    }
}
