//! Scrape Trigger: hands a user's keywords to the AI service.
//!
//! A Reddit trigger does not wait for the service. The audit write is its only
//! durable trace, so that write happens first and its failure is surfaced;
//! dispatch then runs on a spawned task whose outcome is only logged.
//!
//! The Quora run waits for the service and reports its failure. The combined
//! run drives both platforms in turn and only logs failures.

pub mod audit;
pub mod dispatch;
pub mod handlers;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::keywords::KeywordStore;
use crate::models::audit::ScrapeAuditRecord;
use audit::AuditLog;
use dispatch::{DispatchError, DispatchRequest, ScrapeDispatcher};

pub const REDDIT_PLATFORM: &str = "reddit";
pub const QUORA_PLATFORM: &str = "quora";

const QUORA_RUN_FAILED: &str = "Quora scraping failed";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerOutcome {
    pub dispatched: bool,
    pub dispatch_id: Uuid,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoraRunOutcome {
    pub dispatch_id: Uuid,
    pub ai_result: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunAllOutcome {
    pub dispatch_id: Uuid,
    pub keywords: Vec<String>,
    /// Platforms whose run failed, in run order.
    pub failed: Vec<String>,
}

#[derive(Clone)]
pub struct ScrapeTrigger {
    keywords: Arc<dyn KeywordStore>,
    audit: Arc<dyn AuditLog>,
    dispatcher: Arc<dyn ScrapeDispatcher>,
}

impl ScrapeTrigger {
    pub fn new(
        keywords: Arc<dyn KeywordStore>,
        audit: Arc<dyn AuditLog>,
        dispatcher: Arc<dyn ScrapeDispatcher>,
    ) -> Self {
        Self {
            keywords,
            audit,
            dispatcher,
        }
    }

    /// Triggers a Reddit scrape for the user's keywords.
    ///
    /// Fails with `NoKeywordsConfigured` before any side effect when the user
    /// has no keywords, and with `AuditWriteFailed` when the batch insert fails;
    /// nothing is dispatched in either case. Success means the request was
    /// recorded, not that scraping happened.
    pub async fn trigger(&self, user_id: &str, force_login: bool) -> Result<TriggerOutcome, AppError> {
        let keywords = self.keywords_for(user_id).await?;
        let request = run_request(user_id, REDDIT_PLATFORM, keywords.clone(), force_login);
        let dispatch_id = request.dispatch_id;

        let now = Utc::now();
        let records: Vec<ScrapeAuditRecord> = keywords
            .iter()
            .map(|k| ScrapeAuditRecord::pending(user_id, REDDIT_PLATFORM, k, dispatch_id, now))
            .collect();
        self.audit
            .insert_batch(&records)
            .await
            .map_err(AppError::AuditWriteFailed)?;

        self.spawn_dispatch(request);

        info!(
            %dispatch_id,
            user_id,
            keywords = keywords.len(),
            "recorded scrape request"
        );

        Ok(TriggerOutcome {
            dispatched: true,
            dispatch_id,
            keywords,
        })
    }

    /// Runs a Quora scrape and waits for the service's reply.
    ///
    /// A non-2xx reply fails with `ScrapeFailed` carrying the service's error
    /// text.
    pub async fn run_quora(&self, user_id: &str, force_login: bool) -> Result<QuoraRunOutcome, AppError> {
        let keywords = self.keywords_for(user_id).await?;
        let request = run_request(user_id, QUORA_PLATFORM, keywords, force_login);
        let dispatch_id = request.dispatch_id;
        let span = info_span!("quora_run", %dispatch_id, user_id);

        let ai_result = self
            .dispatcher
            .dispatch(&request)
            .instrument(span)
            .await
            .map_err(|e| match e {
                DispatchError::Rejected { message, .. } if !message.trim().is_empty() => {
                    AppError::ScrapeFailed(message)
                }
                other => {
                    warn!(%dispatch_id, "Quora run failed: {other}");
                    AppError::ScrapeFailed(QUORA_RUN_FAILED.to_string())
                }
            })?;

        info!(%dispatch_id, user_id, "Quora run completed");
        Ok(QuoraRunOutcome {
            dispatch_id,
            ai_result,
        })
    }

    /// Runs the Reddit scrape, then the Quora scrape, waiting for each.
    /// A failed platform is logged and listed; the other still runs.
    pub async fn run_all(&self, user_id: &str, force_login: bool) -> Result<RunAllOutcome, AppError> {
        let keywords = self.keywords_for(user_id).await?;
        let dispatch_id = Uuid::new_v4();
        let mut failed = Vec::new();

        for platform in [REDDIT_PLATFORM, QUORA_PLATFORM] {
            let request = DispatchRequest {
                dispatch_id,
                user_id: user_id.to_string(),
                platform: platform.to_string(),
                keywords: keywords.clone(),
                force_login,
            };
            if let Err(e) = self.dispatcher.dispatch(&request).await {
                warn!(%dispatch_id, platform, "scrape run failed: {e}");
                failed.push(platform.to_string());
            }
        }

        info!(%dispatch_id, user_id, failed = failed.len(), "combined scrape run finished");
        Ok(RunAllOutcome {
            dispatch_id,
            keywords,
            failed,
        })
    }

    async fn keywords_for(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let keywords = self.keywords.list(user_id).await?;
        if keywords.is_empty() {
            return Err(AppError::NoKeywordsConfigured);
        }
        Ok(keywords)
    }

    fn spawn_dispatch(&self, request: DispatchRequest) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let span = info_span!(
            "scrape_dispatch",
            dispatch_id = %request.dispatch_id,
            user_id = %request.user_id
        );

        tokio::spawn(
            async move {
                match dispatcher.dispatch(&request).await {
                    Ok(_) => info!(keywords = request.keywords.len(), "scrape dispatched"),
                    Err(e) => warn!("AI service dispatch failed: {e}"),
                }
            }
            .instrument(span),
        );
    }
}

fn run_request(user_id: &str, platform: &str, keywords: Vec<String>, force_login: bool) -> DispatchRequest {
    DispatchRequest {
        dispatch_id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        platform: platform.to_string(),
        keywords,
        force_login,
    }
}
