use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::leads::normalize::normalize;
use crate::leads::sources::LeadSource;
use crate::leads::{Lead, Platform};

/// Fetches every source concurrently and merges the results.
///
/// All-or-nothing: one failed source fails the whole round, there is no
/// partial result. No retries; callers decide whether to try again.
#[derive(Clone)]
pub struct LeadAggregator {
    sources: Vec<Arc<dyn LeadSource>>,
}

impl LeadAggregator {
    /// `sources` order is the output order.
    pub fn new(sources: Vec<Arc<dyn LeadSource>>) -> Self {
        Self { sources }
    }

    /// Platforms in merge order.
    pub fn platforms(&self) -> Vec<Platform> {
        self.sources.iter().map(|s| s.platform()).collect()
    }

    pub async fn aggregate(&self, user_id: &str, bearer: Option<&str>) -> Result<Vec<Lead>, AppError> {
        // join_all waits for every source, successful or not, before we look
        // at any result.
        let results = join_all(
            self.sources
                .iter()
                .map(|source| source.fetch_posts(user_id, bearer)),
        )
        .await;

        let mut raw = Vec::new();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(posts) => {
                    debug!(platform = %source.platform(), posts = posts.len(), "fetched posts");
                    raw.extend(posts);
                }
                Err(e) => {
                    warn!(platform = %source.platform(), user_id, "lead source failed: {e}");
                    return Err(AppError::AggregationFailed(e.to_string()));
                }
            }
        }

        let now = Utc::now();
        let leads: Vec<Lead> = raw
            .into_iter()
            .enumerate()
            .map(|(index, post)| normalize(post, index, now))
            .collect();

        debug!(user_id, leads = leads.len(), sources = self.sources.len(), "aggregated leads");
        Ok(leads)
    }
}
