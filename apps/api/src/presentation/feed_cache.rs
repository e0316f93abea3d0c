use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::presentation::feed::LeadFeed;

pub const DEFAULT_FEED_CAPACITY: usize = 10_000;
pub const DEFAULT_FEED_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// Upper bound on how often idle entries are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct Entry {
    feed: LeadFeed,
    last_seen: Instant,
}

/// Per-user lead feeds, bounded by entry count and idle time.
///
/// A user who has not refreshed within `idle_ttl`, or who was pushed out as the
/// least recently seen entry at capacity, starts over with an `Idle` feed.
pub struct FeedCache {
    entries: HashMap<String, Entry>,
    capacity: usize,
    idle_ttl: Duration,
    last_sweep: Instant,
}

impl FeedCache {
    pub fn new(capacity: usize, idle_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            idle_ttl,
            last_sweep: Instant::now(),
        }
    }

    /// Returns the user's feed, creating it if absent, expired or evicted.
    pub fn get_or_insert(&mut self, user_id: &str) -> &mut LeadFeed {
        let now = Instant::now();
        if now.duration_since(self.last_sweep) >= SWEEP_INTERVAL.min(self.idle_ttl) {
            self.sweep_idle(now);
        }

        let expired = self
            .entries
            .get(user_id)
            .is_some_and(|e| now.duration_since(e.last_seen) >= self.idle_ttl);
        if expired {
            self.entries.remove(user_id);
        }
        if !self.entries.contains_key(user_id) && self.entries.len() >= self.capacity {
            self.evict_least_recent();
        }

        let entry = self
            .entries
            .entry(user_id.to_string())
            .or_insert_with(|| Entry {
                feed: LeadFeed::default(),
                last_seen: now,
            });
        entry.last_seen = now;
        &mut entry.feed
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn sweep_idle(&mut self, now: Instant) {
        let before = self.entries.len();
        let ttl = self.idle_ttl;
        self.entries
            .retain(|_, e| now.duration_since(e.last_seen) < ttl);
        self.last_sweep = now;

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "evicted idle lead feeds");
        }
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_seen)
            .map(|(user_id, _)| user_id.clone());
        if let Some(user_id) = oldest {
            self.entries.remove(&user_id);
            debug!(user_id = %user_id, "evicted least recently seen lead feed");
        }
    }
}

impl Default for FeedCache {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY, DEFAULT_FEED_IDLE_TTL)
    }
}
