//! Recommendation engine
//!
//! Offline ranked lists are blended with an online signal built from the
//! user's most recent events:
//!
//! events (recent 3) -> similarity lookups -> online ranking -> blend with offline

pub mod blender;
pub mod events;
pub mod offline;
pub mod online;
pub mod recommendation;
pub mod similarity;

pub use blender::{blend, dedup_ids};
pub use events::RecentEventStore;
pub use offline::{OfflineCatalog, OfflineLookup, OfflineSnapshot, SnapshotKind};
pub use online::OnlineCandidateGenerator;
pub use recommendation::RecommendationService;
pub use similarity::SimilarityIndex;

use crate::error::Result;
use crate::models::{ItemId, SimilarItem, UserId};
use async_trait::async_trait;

/// Per-user recent event history, in-process or remote
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventHistory: Send + Sync {
    async fn record_event(&self, user_id: UserId, item_id: ItemId) -> Result<()>;

    /// Most-recent-first, at most `k` items.
    async fn fetch_recent(&self, user_id: UserId, k: usize) -> Result<Vec<ItemId>>;
}

/// Item-to-item neighbour lookup, in-process or remote
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimilarityLookup: Send + Sync {
    /// Score-descending, at most `k` distinct candidates.
    async fn fetch_similar(&self, item_id: ItemId, k: usize) -> Result<Vec<SimilarItem>>;

    /// False while an in-process table is still waiting for its load.
    fn is_ready(&self) -> bool {
        true
    }
}
