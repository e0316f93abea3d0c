//! In-memory stand-ins for the storage and network seams, shared by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Notify;

use crate::auth::{TokenVerifier, VerifyError};
use crate::db::QueryError;
use crate::keywords::KeywordStore;
use crate::leads::posts::PostStore;
use crate::leads::sources::{LeadSource, SourceError};
use crate::leads::{Platform, RawPost};
use crate::ledger::{CreditLedger, LedgerError};
use crate::models::audit::ScrapeAuditRecord;
use crate::models::post::{QuoraPost, RedditPost};
use crate::models::user::LedgerRow;
use crate::trigger::audit::AuditLog;
use crate::trigger::dispatch::{DispatchError, DispatchRequest, ScrapeDispatcher};

fn unavailable() -> QueryError {
    QueryError::Sqlx(sqlx::Error::PoolTimedOut)
}

pub fn reddit_post(id: &str) -> RedditPost {
    RedditPost {
        id: Some(id.to_string()),
        user_id: Some("user_1".to_string()),
        platform: Some("reddit".to_string()),
        text: Some(format!("post {id}")),
        url: Some(format!("https://reddit.com/r/saas/{id}")),
        author: Some("u/buyer".to_string()),
        created_at: Some(Utc::now()),
        replies: Vec::new(),
        intent_score: None,
        reply_status: None,
    }
}

pub fn quora_post(id: &str) -> QuoraPost {
    QuoraPost {
        id: Some(id.to_string()),
        user_id: Some("user_1".to_string()),
        platform: Some("quora".to_string()),
        author: None,
        question: Some(format!("question {id}")),
        url: Some(format!("https://quora.com/q/{id}")),
        created_at: Some(Utc::now()),
        reply_option1: None,
        reply_option2: None,
        intent_score: None,
        reply_status: None,
    }
}

#[derive(Default)]
pub struct InMemoryLedger {
    rows: Mutex<HashMap<String, i32>>,
    fail: bool,
}

impl InMemoryLedger {
    pub fn with_balance(user_id: &str, credits: i32) -> Self {
        let ledger = Self::default();
        ledger.rows.lock().unwrap().insert(user_id.to_string(), credits);
        ledger
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn balance(&self, user_id: &str) -> Option<i32> {
        self.rows.lock().unwrap().get(user_id).copied()
    }
}

#[async_trait]
impl CreditLedger for InMemoryLedger {
    async fn fetch(&self, user_id: &str) -> Result<LedgerRow, LedgerError> {
        if self.fail {
            return Err(LedgerError::Query(unavailable()));
        }
        self.balance(user_id)
            .map(|credits| LedgerRow {
                id: user_id.to_string(),
                credits,
                as_of: Utc::now(),
            })
            .ok_or_else(|| LedgerError::NotFound(user_id.to_string()))
    }

    async fn ensure_account(
        &self,
        user_id: &str,
        _email: &str,
        _name: Option<&str>,
        starting_credits: i32,
    ) -> Result<bool, LedgerError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(user_id) {
            return Ok(false);
        }
        rows.insert(user_id.to_string(), starting_credits);
        Ok(true)
    }
}

#[derive(Default)]
pub struct InMemoryKeywords {
    rows: Mutex<HashMap<String, Vec<String>>>,
}

impl InMemoryKeywords {
    pub fn with(user_id: &str, keywords: &[&str]) -> Self {
        let store = Self::default();
        store.rows.lock().unwrap().insert(
            user_id.to_string(),
            keywords.iter().map(|k| k.to_string()).collect(),
        );
        store
    }
}

#[async_trait]
impl KeywordStore for InMemoryKeywords {
    async fn list(&self, user_id: &str) -> Result<Vec<String>, QueryError> {
        Ok(self.rows.lock().unwrap().get(user_id).cloned().unwrap_or_default())
    }

    async fn append(&self, user_id: &str, keywords: &[String]) -> Result<usize, QueryError> {
        self.rows
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .extend(keywords.iter().cloned());
        Ok(keywords.len())
    }
}

#[derive(Default)]
pub struct InMemoryAudit {
    records: Mutex<Vec<ScrapeAuditRecord>>,
    fail: bool,
}

impl InMemoryAudit {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<ScrapeAuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLog for InMemoryAudit {
    async fn insert_batch(&self, records: &[ScrapeAuditRecord]) -> Result<(), QueryError> {
        if self.fail {
            return Err(unavailable());
        }
        self.records.lock().unwrap().extend_from_slice(records);
        Ok(())
    }
}

/// Records every dispatch; fails the listed platforms after recording them.
pub struct RecordingDispatcher {
    calls: Mutex<Vec<DispatchRequest>>,
    notify: Notify,
    fail_on: Vec<&'static str>,
}

impl RecordingDispatcher {
    pub fn succeeding() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            notify: Notify::new(),
            fail_on: Vec::new(),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_on: vec!["reddit", "quora"],
            ..Self::succeeding()
        }
    }

    pub fn failing_for(platform: &'static str) -> Self {
        Self {
            fail_on: vec![platform],
            ..Self::succeeding()
        }
    }

    pub fn calls(&self) -> Vec<DispatchRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Waits for the first dispatch to arrive.
    pub async fn next_call(&self) -> DispatchRequest {
        let wait = async {
            loop {
                let notified = self.notify.notified();
                if let Some(call) = self.calls().first().cloned() {
                    return call;
                }
                notified.await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("dispatch was never called")
    }
}

#[async_trait]
impl ScrapeDispatcher for RecordingDispatcher {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<Value, DispatchError> {
        self.calls.lock().unwrap().push(request.clone());
        self.notify.notify_one();
        if self.fail_on.iter().any(|p| *p == request.platform) {
            return Err(DispatchError::Rejected {
                status: 503,
                message: "connection refused".to_string(),
            });
        }
        Ok(Value::Null)
    }
}

pub struct StaticSource {
    platform: Platform,
    posts: Vec<RawPost>,
    fail: bool,
}

impl StaticSource {
    pub fn reddit(posts: Vec<RedditPost>) -> Self {
        Self {
            platform: Platform::Reddit,
            posts: posts.into_iter().map(RawPost::Reddit).collect(),
            fail: false,
        }
    }

    pub fn quora(posts: Vec<QuoraPost>) -> Self {
        Self {
            platform: Platform::Quora,
            posts: posts.into_iter().map(RawPost::Quora).collect(),
            fail: false,
        }
    }

    pub fn failing(platform: Platform) -> Self {
        Self {
            platform,
            posts: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl LeadSource for StaticSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch_posts(&self, _user_id: &str, _bearer: Option<&str>) -> Result<Vec<RawPost>, SourceError> {
        if self.fail {
            return Err(SourceError::Status {
                platform: self.platform,
                status: 500,
            });
        }
        Ok(self.posts.clone())
    }
}

/// A Quora source that can be switched into failure between rounds.
pub struct ToggleSource {
    inner: StaticSource,
    failing: AtomicBool,
}

impl ToggleSource {
    pub fn quora(posts: Vec<QuoraPost>) -> Self {
        Self {
            inner: StaticSource::quora(posts),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl LeadSource for ToggleSource {
    fn platform(&self) -> Platform {
        self.inner.platform
    }

    async fn fetch_posts(&self, user_id: &str, bearer: Option<&str>) -> Result<Vec<RawPost>, SourceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Status {
                platform: self.inner.platform,
                status: 502,
            });
        }
        self.inner.fetch_posts(user_id, bearer).await
    }
}

/// A Reddit source whose first call is slow and returns `first`. Later calls
/// return `later` at once.
pub struct SlowFirstSource {
    calls: AtomicUsize,
    first: Vec<RedditPost>,
    later: Vec<RedditPost>,
    delay: Duration,
    /// Notified when the first call has started.
    pub started: Notify,
}

impl SlowFirstSource {
    pub fn new(first: Vec<RedditPost>, later: Vec<RedditPost>, delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            first,
            later,
            delay,
            started: Notify::new(),
        }
    }
}

#[async_trait]
impl LeadSource for SlowFirstSource {
    fn platform(&self) -> Platform {
        Platform::Reddit
    }

    async fn fetch_posts(&self, _user_id: &str, _bearer: Option<&str>) -> Result<Vec<RawPost>, SourceError> {
        let posts = if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.started.notify_one();
            tokio::time::sleep(self.delay).await;
            &self.first
        } else {
            &self.later
        };
        Ok(posts.iter().cloned().map(RawPost::Reddit).collect())
    }
}

#[derive(Default)]
pub struct InMemoryPosts {
    pub reddit: Vec<RedditPost>,
    pub quora: Vec<QuoraPost>,
}

#[async_trait]
impl PostStore for InMemoryPosts {
    async fn reddit_posts(&self, user_id: &str) -> Result<Vec<RedditPost>, QueryError> {
        Ok(self
            .reddit
            .iter()
            .filter(|p| p.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn quora_posts(&self, user_id: &str) -> Result<Vec<QuoraPost>, QueryError> {
        Ok(self
            .quora
            .iter()
            .filter(|p| p.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }
}

/// Accepts exactly one token and maps it to one user.
pub struct StaticVerifier {
    pub token: String,
    pub user_id: String,
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<String, VerifyError> {
        if token == self.token {
            Ok(self.user_id.clone())
        } else {
            Err(VerifyError::Rejected)
        }
    }
}
