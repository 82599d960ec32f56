use super::blender::dedup_ids;
use super::{EventHistory, SimilarityLookup};
use crate::metrics::{self, OnlineStage};
use crate::models::{ItemId, RankedList, SimilarItem, UserId};
use crate::utils::with_timeout;
use futures::future::join_all;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Number of most recent events that seed the online list
pub const ONLINE_WINDOW: usize = 3;

/// Online recommendations from the user's latest events
///
/// Algorithm:
/// 1. Fetch the 3 most recent events
/// 2. Look up similar items for each event concurrently
/// 3. Concatenate per-event results in most-recent-first order
/// 4. Stable sort by score descending, dedup, truncate to `k`
///
/// Collaborator failures never fail the request: a failed history read yields
/// an empty list, a failed similarity lookup drops that event's candidates.
pub struct OnlineCandidateGenerator {
    history: Arc<dyn EventHistory>,
    similarity: Arc<dyn SimilarityLookup>,
    timeout: Duration,
}

impl OnlineCandidateGenerator {
    pub fn new(
        history: Arc<dyn EventHistory>,
        similarity: Arc<dyn SimilarityLookup>,
        timeout: Duration,
    ) -> Self {
        Self {
            history,
            similarity,
            timeout,
        }
    }

    pub async fn generate(&self, user_id: UserId, k: usize) -> RankedList {
        let recent = match with_timeout(
            self.timeout,
            "fetch_recent",
            self.history.fetch_recent(user_id, ONLINE_WINDOW),
        )
        .await
        {
            Ok(mut events) => {
                events.truncate(ONLINE_WINDOW);
                events
            }
            Err(e) => {
                warn!(user_id, error = %e, "History unavailable, online list degraded to empty");
                metrics::record_online_failure(OnlineStage::History);
                return Vec::new();
            }
        };

        if recent.is_empty() {
            debug!(user_id, "No recent events, online list empty");
            return Vec::new();
        }

        // join_all yields results in input order, not completion order
        let per_event = join_all(
            recent
                .iter()
                .map(|&item_id| self.similar_or_empty(user_id, item_id, k)),
        )
        .await;

        let recs = rank_candidates(per_event, k);

        debug!(
            user_id,
            events = recent.len(),
            recs = recs.len(),
            "Online recommendations generated"
        );

        recs
    }

    async fn similar_or_empty(
        &self,
        user_id: UserId,
        item_id: ItemId,
        k: usize,
    ) -> Vec<SimilarItem> {
        match with_timeout(
            self.timeout,
            "fetch_similar",
            self.similarity.fetch_similar(item_id, k),
        )
        .await
        {
            Ok(items) => items,
            Err(e) => {
                warn!(user_id, item_id, error = %e, "Similarity lookup failed, skipping event");
                metrics::record_online_failure(OnlineStage::Similarity);
                Vec::new()
            }
        }
    }
}

/// Merge per-event candidate lists into one ranked list.
///
/// `per_event` must be ordered most-recent-first. The sort is stable, so among
/// equal scores (`-0.0` and `0.0` included) the candidate from the more recent
/// event comes first.
pub fn rank_candidates(per_event: Vec<Vec<SimilarItem>>, k: usize) -> RankedList {
    let mut combined: Vec<SimilarItem> = per_event.into_iter().flatten().collect();
    combined.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut recs = dedup_ids(combined.into_iter().map(|c| c.item_id));
    recs.truncate(k);
    recs
}
