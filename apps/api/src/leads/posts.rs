use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{bounded, QueryError};
use crate::models::post::{group_reddit_rows, QuoraPost, QuoraPostRow, RedditPost, RedditPostReplyRow};

const QUORA_POSTS_LIMIT: i64 = 50;

/// Persisted posts written by the AI service, served to the lead sources.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Newest first, each post carrying all its generated replies.
    async fn reddit_posts(&self, user_id: &str) -> Result<Vec<RedditPost>, QueryError>;

    /// Newest first, at most 50.
    async fn quora_posts(&self, user_id: &str) -> Result<Vec<QuoraPost>, QueryError>;
}

#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgPostStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn reddit_posts(&self, user_id: &str) -> Result<Vec<RedditPost>, QueryError> {
        let rows: Vec<RedditPostReplyRow> = bounded(
            self.timeout,
            sqlx::query_as(
                r#"
                SELECT p.id, p.user_id, p.platform, p.text, p.url, p.author, p.created_at,
                       r.generated_reply
                FROM reddit_posts p
                LEFT JOIN reddit_ai_replies r ON r.reddit_post_id = p.id
                WHERE p.user_id = $1
                ORDER BY p.created_at DESC, p.id, r.created_at
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(group_reddit_rows(rows))
    }

    async fn quora_posts(&self, user_id: &str) -> Result<Vec<QuoraPost>, QueryError> {
        let rows: Vec<QuoraPostRow> = bounded(
            self.timeout,
            sqlx::query_as(
                r#"
                SELECT p.id, p.user_id, p.platform, p.author, p.question, p.url, p.created_at,
                       r.reply_option_1 AS reply_option1,
                       r.reply_option_2 AS reply_option2
                FROM quora_posts p
                LEFT JOIN quora_ai_replies r ON r.quora_post_id = p.id
                WHERE p.user_id = $1
                ORDER BY p.created_at DESC
                LIMIT $2
                "#,
            )
            .bind(user_id)
            .bind(QUORA_POSTS_LIMIT)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows.into_iter().map(QuoraPost::from).collect())
    }
}
