//! Keyword Store: buyer keywords per user, in insertion order.

pub mod handlers;
pub mod store;

use async_trait::async_trait;

use crate::db::QueryError;

#[async_trait]
pub trait KeywordStore: Send + Sync {
    /// Keywords in insertion order. Empty when the user configured none.
    async fn list(&self, user_id: &str) -> Result<Vec<String>, QueryError>;

    /// Appends keywords as one batch, preserving their order.
    async fn append(&self, user_id: &str, keywords: &[String]) -> Result<usize, QueryError>;
}

/// Trims keywords and drops blank ones. Duplicates are kept.
pub fn clean_keywords<I>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
