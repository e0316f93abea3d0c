use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// One scrape run handed to the external service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Correlates log lines for this attempt with the audit rows written next to it.
    pub dispatch_id: Uuid,
    pub user_id: String,
    pub platform: String,
    pub keywords: Vec<String>,
    pub force_login: bool,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service rejected run (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

#[async_trait]
pub trait ScrapeDispatcher: Send + Sync {
    /// Returns the service's JSON reply, `Value::Null` when the body is empty
    /// or not JSON.
    async fn dispatch(&self, request: &DispatchRequest) -> Result<Value, DispatchError>;
}
