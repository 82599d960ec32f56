// ============================================
// Recent Event Store
// ============================================
//
// Bounded most-recent-first item history per user.
// In-memory only; lost on restart.

use super::EventHistory;
use crate::error::Result;
use crate::models::{ItemId, UserId};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

pub struct RecentEventStore {
    events: DashMap<UserId, VecDeque<ItemId>>,
    capacity: usize,
}

impl Default for RecentEventStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl RecentEventStore {
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            events: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepend `item_id` to the user's history and drop the tail beyond capacity.
    pub fn record(&self, user_id: UserId, item_id: ItemId) {
        // The entry guard holds the shard write lock, so concurrent records
        // for the same user are serialized.
        let mut history = self
            .events
            .entry(user_id)
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));
        history.push_front(item_id);
        history.truncate(self.capacity);

        debug!(user_id, item_id, len = history.len(), "Event recorded");
    }

    /// First `min(k, capacity)` items, most recent first. Unknown users get an empty list.
    pub fn recent(&self, user_id: UserId, k: usize) -> Vec<ItemId> {
        let limit = k.min(self.capacity);
        self.events
            .get(&user_id)
            .map(|history| history.iter().take(limit).copied().collect())
            .unwrap_or_default()
    }

    pub fn user_count(&self) -> usize {
        self.events.len()
    }
}

#[async_trait]
impl EventHistory for RecentEventStore {
    async fn record_event(&self, user_id: UserId, item_id: ItemId) -> Result<()> {
        self.record(user_id, item_id);
        Ok(())
    }

    async fn fetch_recent(&self, user_id: UserId, k: usize) -> Result<Vec<ItemId>> {
        Ok(self.recent(user_id, k))
    }
}
