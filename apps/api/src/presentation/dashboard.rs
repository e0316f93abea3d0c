use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::leads::aggregator::LeadAggregator;
use crate::leads::Lead;
use crate::ledger::{get_balance, CreditLedger};
use crate::presentation::credit_alert::CreditBanner;
use crate::presentation::feed::FeedState;
use crate::presentation::feed_cache::FeedCache;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub credits: u32,
    pub credit_alert: Option<CreditBanner>,
    pub feed_state: FeedState,
    pub leads: Vec<Lead>,
    pub stale: bool,
    pub error: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Composition root for the dashboard. The ledger and aggregator are passed
/// in; per-user feed state lives here.
#[derive(Clone)]
pub struct Dashboard {
    ledger: Arc<dyn CreditLedger>,
    aggregator: LeadAggregator,
    feeds: Arc<Mutex<FeedCache>>,
}

impl Dashboard {
    pub fn new(
        ledger: Arc<dyn CreditLedger>,
        aggregator: LeadAggregator,
        feeds: FeedCache,
    ) -> Self {
        Self {
            ledger,
            aggregator,
            feeds: Arc::new(Mutex::new(feeds)),
        }
    }

    /// Re-reads credits and leads for the user.
    ///
    /// A failed aggregation is not an error here: the view keeps the last
    /// known leads and flags them stale. A failed credit read is.
    pub async fn refresh(&self, user_id: &str, bearer: Option<&str>) -> Result<DashboardView, AppError> {
        let generation = self.feeds.lock().await.get_or_insert(user_id).begin_refresh();

        // The lock is not held across the fetches.
        let (balance, leads) = tokio::join!(
            get_balance(self.ledger.as_ref(), user_id),
            self.aggregator.aggregate(user_id, bearer)
        );

        let mut feeds = self.feeds.lock().await;
        let feed = feeds.get_or_insert(user_id);
        feed.complete(generation, leads);
        let balance = balance?;

        Ok(DashboardView {
            credits: balance.credits,
            credit_alert: CreditBanner::for_balance(balance.credits),
            feed_state: feed.state(),
            leads: feed.leads().to_vec(),
            stale: feed.is_stale(),
            error: feed.error().map(str::to_string),
            refreshed_at: feed.refreshed_at(),
        })
    }
}
