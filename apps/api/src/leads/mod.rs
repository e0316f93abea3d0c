//! Lead Aggregator: fetch posts from every source, normalize them into one
//! `Lead` shape, concatenate in source order.

pub mod aggregator;
pub mod handlers;
pub mod normalize;
pub mod posts;
pub mod sources;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::post::{QuoraPost, RedditPost};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Reddit,
    Quora,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Reddit => "reddit",
            Platform::Quora => "quora",
        }
    }

    /// Path of this platform's posts endpoint, relative to the source base URL.
    pub fn posts_path(self) -> &'static str {
        match self {
            Platform::Reddit => "/reddit/posts",
            Platform::Quora => "/quora/posts",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post as a source returned it, tagged by platform.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPost {
    Reddit(RedditPost),
    Quora(QuoraPost),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn from_intent(intent: u8) -> Self {
        if intent >= 80 {
            Sentiment::Positive
        } else if intent >= 60 {
            Sentiment::Neutral
        } else {
            Sentiment::Negative
        }
    }
}

/// Normalized, ephemeral view of one source post. Rebuilt on every aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub platform: String,
    pub author: String,
    pub intent_score: u8,
    pub sentiment: Sentiment,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub url: Option<String>,
    pub reply_options: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_boundaries() {
        assert_eq!(Sentiment::from_intent(100), Sentiment::Positive);
        assert_eq!(Sentiment::from_intent(80), Sentiment::Positive);
        assert_eq!(Sentiment::from_intent(79), Sentiment::Neutral);
        assert_eq!(Sentiment::from_intent(60), Sentiment::Neutral);
        assert_eq!(Sentiment::from_intent(59), Sentiment::Negative);
        assert_eq!(Sentiment::from_intent(0), Sentiment::Negative);
    }

    #[test]
    fn test_platform_paths() {
        assert_eq!(Platform::Reddit.posts_path(), "/reddit/posts");
        assert_eq!(Platform::Quora.posts_path(), "/quora/posts");
        assert_eq!(Platform::Quora.to_string(), "quora");
    }
}
