use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Credits granted when a user is first synced from the identity provider.
pub const STARTING_CREDITS: i32 = 20;

/// The ledger view of a user row. `credits` is the raw stored value and may be
/// negative after a concurrent overspend by the billing side.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LedgerRow {
    pub id: String,
    pub credits: i32,
    pub as_of: DateTime<Utc>,
}

/// Identity fields pushed by the frontend after sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub clerk_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}
