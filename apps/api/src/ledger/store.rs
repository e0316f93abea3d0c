use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::bounded;
use crate::ledger::{CreditLedger, LedgerError};
use crate::models::user::LedgerRow;

/// Postgres-backed ledger over the `users` table.
#[derive(Clone)]
pub struct PgCreditLedger {
    pool: PgPool,
    timeout: Duration,
}

impl PgCreditLedger {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl CreditLedger for PgCreditLedger {
    async fn fetch(&self, user_id: &str) -> Result<LedgerRow, LedgerError> {
        let row: Option<LedgerRow> = bounded(
            self.timeout,
            sqlx::query_as("SELECT id, credits, NOW() AS as_of FROM users WHERE id = $1 LIMIT 1")
                .bind(user_id)
                .fetch_optional(&self.pool),
        )
        .await?;

        row.ok_or_else(|| LedgerError::NotFound(user_id.to_string()))
    }

    async fn ensure_account(
        &self,
        user_id: &str,
        email: &str,
        name: Option<&str>,
        starting_credits: i32,
    ) -> Result<bool, LedgerError> {
        // Existing rows are left untouched; sync never resets a balance.
        let result = bounded(
            self.timeout,
            sqlx::query(
                r#"
                INSERT INTO users (id, email, name, credits)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(email)
            .bind(name)
            .bind(starting_credits)
            .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
