use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A Reddit post joined with at most one generated reply. Several rows share a
/// post id when a post has several replies.
#[derive(Debug, Clone, FromRow)]
pub struct RedditPostReplyRow {
    pub id: Uuid,
    pub user_id: String,
    pub platform: Option<String>,
    pub text: String,
    pub url: String,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub generated_reply: Option<String>,
}

/// A Reddit post with all of its generated replies, as served by `/reddit/posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedditPost {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub platform: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub replies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_status: Option<String>,
}

/// A Quora question left-joined with its reply options.
#[derive(Debug, Clone, FromRow)]
pub struct QuoraPostRow {
    pub id: Uuid,
    pub user_id: String,
    pub platform: String,
    pub author: Option<String>,
    pub question: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub reply_option1: Option<String>,
    pub reply_option2: Option<String>,
}

/// A Quora question with its reply options, as served by `/quora/posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoraPost {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub platform: Option<String>,
    pub author: Option<String>,
    pub question: Option<String>,
    pub url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub reply_option1: Option<String>,
    pub reply_option2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_status: Option<String>,
}

impl From<QuoraPostRow> for QuoraPost {
    fn from(row: QuoraPostRow) -> Self {
        Self {
            id: Some(row.id.to_string()),
            user_id: Some(row.user_id),
            platform: Some(row.platform),
            author: row.author,
            question: Some(row.question),
            url: Some(row.url),
            created_at: Some(row.created_at),
            reply_option1: row.reply_option1,
            reply_option2: row.reply_option2,
            intent_score: None,
            reply_status: None,
        }
    }
}

/// Folds joined post/reply rows into one post per id, keeping the row order
/// (newest first) and the order replies arrived in.
pub fn group_reddit_rows(rows: Vec<RedditPostReplyRow>) -> Vec<RedditPost> {
    let mut posts: Vec<RedditPost> = Vec::new();
    let mut index_by_id: std::collections::HashMap<Uuid, usize> = std::collections::HashMap::new();

    for row in rows {
        let idx = *index_by_id.entry(row.id).or_insert_with(|| {
            posts.push(RedditPost {
                id: Some(row.id.to_string()),
                user_id: Some(row.user_id.clone()),
                platform: row.platform.clone(),
                text: Some(row.text.clone()),
                url: Some(row.url.clone()),
                author: row.author.clone(),
                created_at: row.created_at,
                replies: Vec::new(),
                intent_score: None,
                reply_status: None,
            });
            posts.len() - 1
        });

        if let Some(reply) = row.generated_reply.filter(|r| !r.is_empty()) {
            posts[idx].replies.push(reply);
        }
    }

    posts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: Uuid, reply: Option<&str>) -> RedditPostReplyRow {
        RedditPostReplyRow {
            id,
            user_id: "user_1".into(),
            platform: Some("reddit".into()),
            text: "Looking for a CRM".into(),
            url: format!("https://reddit.com/r/sales/{id}"),
            author: Some("u/buyer".into()),
            created_at: None,
            generated_reply: reply.map(str::to_string),
        }
    }

    #[test]
    fn test_group_reddit_rows_collects_replies_per_post() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let posts = group_reddit_rows(vec![
            row(a, Some("reply 1")),
            row(a, Some("reply 2")),
            row(b, None),
        ]);

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id.as_deref(), Some(a.to_string().as_str()));
        assert_eq!(posts[0].replies, vec!["reply 1", "reply 2"]);
        assert!(posts[1].replies.is_empty());
    }

    #[test]
    fn test_group_reddit_rows_skips_empty_replies() {
        let a = Uuid::new_v4();
        let posts = group_reddit_rows(vec![row(a, Some("")), row(a, Some("ok"))]);
        assert_eq!(posts[0].replies, vec!["ok"]);
    }
}
