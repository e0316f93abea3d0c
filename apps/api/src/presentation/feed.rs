use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::leads::Lead;

pub const LEADS_UNAVAILABLE: &str = "Leads unavailable, try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedState {
    Idle,
    Loading,
    Success,
    Failed,
}

/// Ticket handed out by [`LeadFeed::begin_refresh`]. Later refreshes get
/// larger generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// One user's lead feed. A failed refresh keeps the previously displayed
/// leads; only a successful one replaces them.
///
/// Overlapping refreshes are applied in the order they started. A result that
/// arrives after a newer one was applied is dropped.
#[derive(Debug, Clone)]
pub struct LeadFeed {
    state: FeedState,
    leads: Vec<Lead>,
    error: Option<String>,
    refreshed_at: Option<DateTime<Utc>>,
    started: u64,
    applied: u64,
}

impl Default for LeadFeed {
    fn default() -> Self {
        Self {
            state: FeedState::Idle,
            leads: Vec::new(),
            error: None,
            refreshed_at: None,
            started: 0,
            applied: 0,
        }
    }
}

impl LeadFeed {
    /// Any state may re-enter `Loading`.
    pub fn begin_refresh(&mut self) -> Generation {
        self.started += 1;
        self.state = FeedState::Loading;
        Generation(self.started)
    }

    /// Applies the result of the refresh that was issued `generation`.
    /// Returns false when the result was superseded and ignored.
    pub fn complete(&mut self, generation: Generation, result: Result<Vec<Lead>, AppError>) -> bool {
        if generation.0 <= self.applied {
            tracing::debug!(
                generation = generation.0,
                applied = self.applied,
                "dropping superseded lead refresh"
            );
            return false;
        }
        self.applied = generation.0;

        match result {
            Ok(leads) => {
                self.state = FeedState::Success;
                self.leads = leads;
                self.error = None;
                self.refreshed_at = Some(Utc::now());
            }
            Err(e) => {
                tracing::warn!("lead refresh failed, keeping last known leads: {e}");
                self.state = FeedState::Failed;
                self.error = Some(LEADS_UNAVAILABLE.to_string());
            }
        }

        // A newer refresh is still in flight.
        if self.started > self.applied {
            self.state = FeedState::Loading;
        }
        true
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// True when the shown leads did not come from the latest refresh.
    pub fn is_stale(&self) -> bool {
        self.state == FeedState::Failed
    }
}
