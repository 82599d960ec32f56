use super::blender::blend;
use super::offline::OfflineCatalog;
use super::online::OnlineCandidateGenerator;
use super::{EventHistory, SimilarityLookup};
use crate::error::Result;
use crate::models::{ItemId, RankedList, SimilarItem, UsageStats, UserId};
use crate::utils::with_timeout;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Request-facing recommendation operations.
///
/// Owns the offline catalog and the online generator; history and similarity
/// are reached through their ports so either can live in another process.
pub struct RecommendationService {
    catalog: Arc<OfflineCatalog>,
    history: Arc<dyn EventHistory>,
    similarity: Arc<dyn SimilarityLookup>,
    online: OnlineCandidateGenerator,
    timeout: Duration,
}

impl RecommendationService {
    pub fn new(
        catalog: Arc<OfflineCatalog>,
        history: Arc<dyn EventHistory>,
        similarity: Arc<dyn SimilarityLookup>,
        timeout: Duration,
    ) -> Self {
        let online =
            OnlineCandidateGenerator::new(Arc::clone(&history), Arc::clone(&similarity), timeout);

        Self {
            catalog,
            history,
            similarity,
            online,
            timeout,
        }
    }

    /// True once every in-process catalog has completed its load.
    pub fn is_ready(&self) -> bool {
        self.catalog.is_ready() && self.similarity.is_ready()
    }

    pub async fn record_event(&self, user_id: UserId, item_id: ItemId) -> Result<()> {
        with_timeout(
            self.timeout,
            "record_event",
            self.history.record_event(user_id, item_id),
        )
        .await
    }

    pub async fn recent_events(&self, user_id: UserId, k: usize) -> Result<Vec<ItemId>> {
        with_timeout(
            self.timeout,
            "fetch_recent",
            self.history.fetch_recent(user_id, k),
        )
        .await
    }

    pub async fn similar_items(&self, item_id: ItemId, k: usize) -> Result<Vec<SimilarItem>> {
        with_timeout(
            self.timeout,
            "fetch_similar",
            self.similarity.fetch_similar(item_id, k),
        )
        .await
    }

    pub fn default_recs(&self, k: usize) -> Result<RankedList> {
        self.catalog.default_list(k)
    }

    /// Personal list, falling back to the default list if the lookup itself fails.
    pub fn offline_recs(&self, user_id: UserId, k: usize) -> Result<RankedList> {
        match self.catalog.get(user_id, k) {
            Ok(recs) => Ok(recs),
            Err(e) => {
                error!(user_id, error = %e, "Offline lookup failed, serving default list");
                self.catalog.default_list(k)
            }
        }
    }

    pub async fn online_recs(&self, user_id: UserId, k: usize) -> RankedList {
        self.online.generate(user_id, k).await
    }

    /// Offline and online lists computed concurrently, then blended.
    ///
    /// Only a catalog that cannot serve even the default list fails the request.
    pub async fn blended_recs(&self, user_id: UserId, k: usize) -> Result<RankedList> {
        let (offline, online) = tokio::join!(
            async { self.offline_recs(user_id, k) },
            self.online.generate(user_id, k)
        );
        let offline = offline?;

        let recs = blend(&offline, &online, k);
        debug!(
            user_id,
            offline = offline.len(),
            online = online.len(),
            blended = recs.len(),
            "Blended recommendations"
        );

        Ok(recs)
    }

    pub fn stats(&self) -> UsageStats {
        self.catalog.stats()
    }

    pub fn log_stats(&self) {
        let stats = self.stats();
        info!(
            personal_hits = stats.personal_hits,
            default_hits = stats.default_hits,
            "Stats for recommendations"
        );
    }
}
