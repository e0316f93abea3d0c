//! Resource Ledger: per-user credit balance.
//!
//! Spending happens elsewhere. This module provisions the row on first sync,
//! reads the current row and turns it into a display balance that is never
//! negative.

pub mod handlers;
pub mod store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::db::QueryError;
use crate::errors::AppError;
use crate::models::user::LedgerRow;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no ledger row for user {0}")]
    NotFound(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Storage seam for the credit ledger. Carried in `AppState` as `Arc<dyn CreditLedger>`.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Returns the raw ledger row, or `LedgerError::NotFound` when the user
    /// has not been provisioned yet.
    async fn fetch(&self, user_id: &str) -> Result<LedgerRow, LedgerError>;

    /// Creates the user's ledger row with `starting_credits` if it does not
    /// exist. Returns `true` when a row was created.
    async fn ensure_account(
        &self,
        user_id: &str,
        email: &str,
        name: Option<&str>,
        starting_credits: i32,
    ) -> Result<bool, LedgerError>;
}

/// Display balance. `credits` is clamped at zero, `raw_credits` is what the
/// store actually holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalance {
    pub user_id: String,
    pub credits: u32,
    pub raw_credits: i32,
    pub as_of: DateTime<Utc>,
}

impl CreditBalance {
    fn from_row(row: LedgerRow) -> Self {
        Self {
            credits: u32::try_from(row.credits.max(0)).unwrap_or(0),
            raw_credits: row.credits,
            user_id: row.id,
            as_of: row.as_of,
        }
    }

    fn unprovisioned(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            credits: 0,
            raw_credits: 0,
            as_of: Utc::now(),
        }
    }
}

/// Reads the user's balance. A missing ledger row reads as zero credits.
pub async fn get_balance(ledger: &dyn CreditLedger, user_id: &str) -> Result<CreditBalance, AppError> {
    match ledger.fetch(user_id).await {
        Ok(row) => {
            if row.credits < 0 {
                tracing::warn!(user_id, raw_credits = row.credits, "ledger holds a negative balance");
            }
            Ok(CreditBalance::from_row(row))
        }
        Err(LedgerError::NotFound(_)) => Ok(CreditBalance::unprovisioned(user_id)),
        Err(LedgerError::Query(e)) => Err(AppError::Database(e)),
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotFound(user_id) => AppError::NotFound(format!("No ledger row for {user_id}")),
            LedgerError::Query(e) => AppError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryLedger;

    #[tokio::test]
    async fn test_missing_row_reads_as_zero() {
        let ledger = InMemoryLedger::default();
        let balance = get_balance(&ledger, "user_new").await.unwrap();
        assert_eq!(balance.credits, 0);
        assert_eq!(balance.raw_credits, 0);
    }

    #[tokio::test]
    async fn test_negative_balance_is_clamped_but_raw_preserved() {
        let ledger = InMemoryLedger::with_balance("user_1", -7);
        let balance = get_balance(&ledger, "user_1").await.unwrap();
        assert_eq!(balance.credits, 0);
        assert_eq!(balance.raw_credits, -7);
    }

    #[tokio::test]
    async fn test_repeated_reads_are_stable() {
        let ledger = InMemoryLedger::with_balance("user_1", 120);
        let first = get_balance(&ledger, "user_1").await.unwrap();
        let second = get_balance(&ledger, "user_1").await.unwrap();
        assert_eq!(first.credits, 120);
        assert_eq!(first.credits, second.credits);
        assert_eq!(first.raw_credits, second.raw_credits);
    }

    #[tokio::test]
    async fn test_query_failure_propagates() {
        let ledger = InMemoryLedger::failing();
        let err = get_balance(&ledger, "user_1").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
