use super::SimilarityLookup;
use crate::error::{AppError, Result};
use crate::models::{ItemId, SimilarItem, SimilarityEntry, SimilarityRecord};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Read-only item-to-item neighbour table.
///
/// Loaded once from a snapshot; every query before that fails with
/// `CatalogUnready`. Per source item, candidates are stored score-descending
/// with snapshot order kept for equal scores, and each candidate appears once.
#[derive(Default)]
pub struct SimilarityIndex {
    entries: OnceCell<HashMap<ItemId, Vec<SimilarityEntry>>>,
}

impl SimilarityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from `(source, candidate, score)` records.
    ///
    /// Returns the number of source items indexed.
    pub fn load<I>(&self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = SimilarityRecord>,
    {
        if self.entries.get().is_some() {
            return Err(AppError::AlreadyLoaded("similarity index".to_string()));
        }

        let mut grouped: HashMap<ItemId, Vec<SimilarityEntry>> = HashMap::new();
        let mut skipped = 0usize;
        for record in records {
            if record.score.is_nan() {
                skipped += 1;
                continue;
            }
            grouped.entry(record.source).or_default().push(SimilarityEntry {
                source: record.source,
                candidate: record.candidate,
                score: record.score,
            });
        }

        for candidates in grouped.values_mut() {
            // sort_by is stable: equal scores keep snapshot order
            candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
            let mut seen = HashSet::with_capacity(candidates.len());
            candidates.retain(|entry| seen.insert(entry.candidate));
        }

        if skipped > 0 {
            warn!(skipped, "Skipped similarity records with NaN score");
        }

        let sources = grouped.len();
        self.entries
            .set(grouped)
            .map_err(|_| AppError::AlreadyLoaded("similarity index".to_string()))?;

        info!(sources, "Similarity index loaded");
        Ok(sources)
    }

    pub fn is_ready(&self) -> bool {
        self.entries.get().is_some()
    }

    /// Up to `k` neighbours of `item_id`, best first. Unknown items yield an empty list.
    pub fn query(&self, item_id: ItemId, k: usize) -> Result<Vec<SimilarityEntry>> {
        let entries = self
            .entries
            .get()
            .ok_or_else(|| AppError::CatalogUnready("similarity index".to_string()))?;

        Ok(entries
            .get(&item_id)
            .map(|candidates| candidates.iter().take(k).copied().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl SimilarityLookup for SimilarityIndex {
    async fn fetch_similar(&self, item_id: ItemId, k: usize) -> Result<Vec<SimilarItem>> {
        Ok(self
            .query(item_id, k)?
            .into_iter()
            .map(SimilarItem::from)
            .collect())
    }

    fn is_ready(&self) -> bool {
        SimilarityIndex::is_ready(self)
    }
}
