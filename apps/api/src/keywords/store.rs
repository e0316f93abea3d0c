use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::{bounded, QueryError};
use crate::keywords::KeywordStore;

#[derive(Clone)]
pub struct PgKeywordStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgKeywordStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl KeywordStore for PgKeywordStore {
    async fn list(&self, user_id: &str) -> Result<Vec<String>, QueryError> {
        bounded(
            self.timeout,
            sqlx::query_scalar("SELECT keyword FROM buyer_keywords WHERE user_id = $1 ORDER BY id ASC")
                .bind(user_id)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn append(&self, user_id: &str, keywords: &[String]) -> Result<usize, QueryError> {
        if keywords.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO buyer_keywords (user_id, keyword) ");
        builder.push_values(keywords, |mut row, keyword| {
            row.push_bind(user_id).push_bind(keyword);
        });

        let result = bounded(self.timeout, builder.build().execute(&self.pool)).await?;
        Ok(result.rows_affected() as usize)
    }
}
