use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::{bounded, QueryError};
use crate::models::audit::ScrapeAuditRecord;

/// Durable trail of scrape requests.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Writes all records in one statement; either every row lands or none.
    async fn insert_batch(&self, records: &[ScrapeAuditRecord]) -> Result<(), QueryError>;
}

#[derive(Clone)]
pub struct PgAuditLog {
    pool: PgPool,
    timeout: Duration,
}

impl PgAuditLog {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl AuditLog for PgAuditLog {
    async fn insert_batch(&self, records: &[ScrapeAuditRecord]) -> Result<(), QueryError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO scrape_audit (user_id, platform, text, url, author, dispatch_id, created_at) ",
        );
        builder.push_values(records, |mut row, record| {
            row.push_bind(&record.user_id)
                .push_bind(&record.platform)
                .push_bind(&record.text)
                .push_bind(&record.url)
                .push_bind(&record.author)
                .push_bind(record.dispatch_id)
                .push_bind(record.created_at);
        });

        bounded(self.timeout, builder.build().execute(&self.pool)).await?;
        Ok(())
    }
}
