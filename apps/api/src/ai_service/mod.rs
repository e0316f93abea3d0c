/// AI service client: the single point of entry for calls to the external
/// scraping/AI service.
///
/// No other module may call that service directly. The service writes posts
/// straight to the database; its reply body is handed back as raw JSON and
/// only the Quora run shows it to the caller.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::trigger::dispatch::{DispatchError, DispatchRequest, ScrapeDispatcher};

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    keywords: &'a [String],
    force_login: bool,
}

#[derive(Clone)]
pub struct AiServiceClient {
    client: Client,
    base_url: String,
}

impl AiServiceClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
        })
    }

    fn run_url(&self, request: &DispatchRequest) -> String {
        format!("{}/{}/run", self.base_url, request.platform)
    }
}

#[async_trait]
impl ScrapeDispatcher for AiServiceClient {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<Value, DispatchError> {
        let body = RunRequest {
            user_id: &request.user_id,
            keywords: &request.keywords,
            force_login: request.force_login,
        };

        let response = self
            .client
            .post(self.run_url(request))
            .header("x-dispatch-id", request.dispatch_id.to_string())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        debug!(
            dispatch_id = %request.dispatch_id,
            platform = %request.platform,
            "AI service accepted scrape run"
        );
        Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
    }
}
