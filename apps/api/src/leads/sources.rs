use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::leads::{Platform, RawPost};
use crate::models::post::{QuoraPost, RedditPost};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{platform} request failed: {source}")]
    Http {
        platform: Platform,
        #[source]
        source: reqwest::Error,
    },

    #[error("{platform} returned status {status}")]
    Status { platform: Platform, status: u16 },

    #[error("{platform} returned a malformed body: {message}")]
    Malformed { platform: Platform, message: String },
}

/// One platform's posts for a user.
#[async_trait]
pub trait LeadSource: Send + Sync {
    fn platform(&self) -> Platform;

    async fn fetch_posts(&self, user_id: &str, bearer: Option<&str>) -> Result<Vec<RawPost>, SourceError>;
}

#[derive(Debug, Deserialize)]
struct PostsEnvelope<T> {
    #[serde(default = "Vec::new")]
    posts: Vec<T>,
}

/// Reads `GET {base_url}/{platform}/posts?userId=...`.
#[derive(Clone)]
pub struct HttpLeadSource {
    platform: Platform,
    client: Client,
    base_url: String,
}

impl HttpLeadSource {
    pub fn new(platform: Platform, base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            platform,
            client: Client::builder().timeout(timeout).build()?,
            base_url,
        })
    }

    fn parse<T: DeserializeOwned>(&self, body: &[u8]) -> Result<Vec<T>, SourceError> {
        serde_json::from_slice::<PostsEnvelope<T>>(body)
            .map(|envelope| envelope.posts)
            .map_err(|e| SourceError::Malformed {
                platform: self.platform,
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl LeadSource for HttpLeadSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch_posts(&self, user_id: &str, bearer: Option<&str>) -> Result<Vec<RawPost>, SourceError> {
        let platform = self.platform;
        let url = format!("{}{}", self.base_url, platform.posts_path());

        let mut request = self.client.get(url).query(&[("userId", user_id)]);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| SourceError::Http { platform, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                platform,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| SourceError::Http { platform, source })?;

        let posts = match platform {
            Platform::Reddit => self
                .parse::<RedditPost>(&body)?
                .into_iter()
                .map(RawPost::Reddit)
                .collect(),
            Platform::Quora => self
                .parse::<QuoraPost>(&body)?
                .into_iter()
                .map(RawPost::Quora)
                .collect(),
        };
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(platform: Platform, server: &MockServer) -> HttpLeadSource {
        HttpLeadSource::new(platform, server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetches_reddit_posts_for_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reddit/posts"))
            .and(query_param("userId", "user_1"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "posts": [
                    { "id": "a", "text": "need a CRM", "author": "u/x", "replies": ["hi"] }
                ]
            })))
            .mount(&server)
            .await;

        let posts = source(Platform::Reddit, &server)
            .fetch_posts("user_1", Some("tok"))
            .await
            .unwrap();

        assert_eq!(posts.len(), 1);
        let RawPost::Reddit(post) = &posts[0] else {
            panic!("expected a reddit post");
        };
        assert_eq!(post.id.as_deref(), Some("a"));
        assert_eq!(post.replies, vec!["hi"]);
    }

    #[tokio::test]
    async fn test_missing_posts_field_reads_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quora/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })))
            .mount(&server)
            .await;

        let posts = source(Platform::Quora, &server).fetch_posts("user_1", None).await.unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = source(Platform::Quora, &server).fetch_posts("user_1", None).await.unwrap_err();
        assert!(matches!(err, SourceError::Status { platform: Platform::Quora, status: 500 }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = source(Platform::Reddit, &server).fetch_posts("user_1", None).await.unwrap_err();
        assert!(matches!(err, SourceError::Malformed { platform: Platform::Reddit, .. }));
    }
}
