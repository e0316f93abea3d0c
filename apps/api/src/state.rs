use std::sync::Arc;

use crate::keywords::KeywordStore;
use crate::leads::posts::PostStore;
use crate::ledger::CreditLedger;
use crate::presentation::dashboard::Dashboard;
use crate::trigger::ScrapeTrigger;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every collaborator sits behind a trait so handlers run against in-memory stores in tests.
#[derive(Clone)]
pub struct AppState {
    pub keywords: Arc<dyn KeywordStore>,
    pub ledger: Arc<dyn CreditLedger>,
    pub posts: Arc<dyn PostStore>,
    pub trigger: ScrapeTrigger,
    /// Holds per-user lead feeds; built from the same ledger plus the lead aggregator.
    pub dashboard: Dashboard,
}
