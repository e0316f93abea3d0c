//! Bearer-token boundary. Tokens are verified by an external service; the
//! user id it returns is the only identity handlers trust.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::errors::AppError;

/// Identity established by the verifier, stored as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub user_id: String,
    pub token: String,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token rejected")]
    Rejected,

    #[error("verifier unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("verifier returned an unexpected body: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, VerifyError>;
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    sub: String,
}

/// Posts the bearer token to the verification endpoint and reads `{ "sub": ... }`.
#[derive(Clone)]
pub struct RemoteTokenVerifier {
    client: Client,
    url: String,
}

impl RemoteTokenVerifier {
    pub fn new(url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url,
        })
    }
}

#[async_trait]
impl TokenVerifier for RemoteTokenVerifier {
    async fn verify(&self, token: &str) -> Result<String, VerifyError> {
        let response = self.client.post(&self.url).bearer_auth(token).send().await?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(VerifyError::Rejected);
        }
        if !status.is_success() {
            return Err(VerifyError::Malformed(format!("status {status}")));
        }

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| VerifyError::Malformed(e.to_string()))?;
        if body.sub.trim().is_empty() {
            return Err(VerifyError::Rejected);
        }
        Ok(body.sub)
    }
}

/// Auth settings used by the middleware. `verifier == None` disables auth.
#[derive(Clone)]
pub struct AuthState {
    verifier: Option<Arc<dyn TokenVerifier>>,
}

impl AuthState {
    pub fn enabled(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            verifier: Some(verifier),
        }
    }

    pub fn disabled() -> Self {
        warn!("AUTH_VERIFY_URL not set; bearer auth disabled, client-supplied userId is trusted");
        Self { verifier: None }
    }
}

/// Middleware enforcing bearer auth when enabled. On success the request
/// carries a [`VerifiedUser`] extension.
pub async fn require_auth(State(auth): State<AuthState>, mut req: Request, next: Next) -> Response {
    let Some(verifier) = auth.verifier else {
        return next.run(req).await;
    };

    let Some(token) = extract_bearer_token(req.headers().get(AUTHORIZATION)) else {
        return AppError::Unauthorized.into_response();
    };

    match verifier.verify(&token).await {
        Ok(user_id) => {
            req.extensions_mut().insert(VerifiedUser { user_id, token });
            next.run(req).await
        }
        Err(VerifyError::Transport(e)) => {
            AppError::Upstream(format!("token verification failed: {e}")).into_response()
        }
        Err(e) => {
            warn!("Auth error: {e}");
            AppError::Unauthorized.into_response()
        }
    }
}

fn extract_bearer_token(header: Option<&HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// `?userId=` as sent by the dashboard. Only trusted when auth is disabled.
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Picks the user id a handler acts for.
///
/// With auth on, the verified id wins and a conflicting client-supplied id is
/// refused. With auth off, the client-supplied id is required.
pub fn resolve_user_id(
    verified: Option<&VerifiedUser>,
    supplied: Option<&str>,
) -> Result<String, AppError> {
    let supplied = supplied.map(str::trim).filter(|s| !s.is_empty());
    match (verified, supplied) {
        (Some(user), Some(id)) if id != user.user_id => Err(AppError::Forbidden),
        (Some(user), _) => Ok(user.user_id.clone()),
        (None, Some(id)) => Ok(id.to_string()),
        (None, None) => Err(AppError::missing_user_id()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn verified(id: &str) -> VerifiedUser {
        VerifiedUser {
            user_id: id.to_string(),
            token: "tok".to_string(),
        }
    }

    #[test]
    fn test_extract_bearer_token() {
        let value = HeaderValue::from_static("Bearer abc123");
        assert_eq!(extract_bearer_token(Some(&value)).as_deref(), Some("abc123"));

        let basic = HeaderValue::from_static("Basic abc123");
        assert_eq!(extract_bearer_token(Some(&basic)), None);

        let empty = HeaderValue::from_static("Bearer  ");
        assert_eq!(extract_bearer_token(Some(&empty)), None);
        assert_eq!(extract_bearer_token(None), None);
    }

    #[test]
    fn test_resolve_prefers_verified_identity() {
        let user = verified("user_1");
        assert_eq!(resolve_user_id(Some(&user), None).unwrap(), "user_1");
        assert_eq!(resolve_user_id(Some(&user), Some("user_1")).unwrap(), "user_1");
        assert!(matches!(
            resolve_user_id(Some(&user), Some("user_2")),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_resolve_without_auth_requires_supplied_id() {
        assert_eq!(resolve_user_id(None, Some(" user_9 ")).unwrap(), "user_9");
        assert!(matches!(resolve_user_id(None, None), Err(AppError::Validation(_))));
        assert!(matches!(resolve_user_id(None, Some("")), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_remote_verifier_reads_subject() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "sub": "user_42" })))
            .mount(&server)
            .await;

        let verifier = RemoteTokenVerifier::new(server.uri(), Duration::from_secs(5)).unwrap();
        assert_eq!(verifier.verify("good").await.unwrap(), "user_42");
    }

    #[tokio::test]
    async fn test_remote_verifier_maps_401_to_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let verifier = RemoteTokenVerifier::new(server.uri(), Duration::from_secs(5)).unwrap();
        assert!(matches!(verifier.verify("bad").await, Err(VerifyError::Rejected)));
    }
}
