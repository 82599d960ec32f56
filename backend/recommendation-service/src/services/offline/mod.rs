use crate::error::{AppError, Result};
use crate::metrics::{self, OfflineHit};
use crate::models::{DefaultRecord, ItemId, PersonalRecord, RankedList, UsageStats, UserId};
use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Personal,
    Default,
}

impl SnapshotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKind::Personal => "personal",
            SnapshotKind::Default => "default",
        }
    }
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records for one of the two offline loads
#[derive(Debug, Clone)]
pub enum OfflineSnapshot {
    Personal(Vec<PersonalRecord>),
    Default(Vec<DefaultRecord>),
}

impl OfflineSnapshot {
    pub fn kind(&self) -> SnapshotKind {
        match self {
            OfflineSnapshot::Personal(_) => SnapshotKind::Personal,
            OfflineSnapshot::Default(_) => SnapshotKind::Default,
        }
    }
}

/// Outcome of a personal lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineLookup<'a> {
    Found(&'a [ItemId]),
    UseDefault,
}

/// Precomputed per-user ranked lists plus the global default list.
///
/// Both halves are loaded exactly once and are read-only afterwards.
#[derive(Default)]
pub struct OfflineCatalog {
    personal: OnceCell<HashMap<UserId, RankedList>>,
    default: OnceCell<RankedList>,
    personal_hits: AtomicU64,
    default_hits: AtomicU64,
}

impl OfflineCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of ranked lists built (users for personal, 1 for default).
    pub fn load(&self, snapshot: OfflineSnapshot) -> Result<usize> {
        let kind = snapshot.kind();
        info!(kind = %kind, "Loading recommendations");

        let loaded = match snapshot {
            OfflineSnapshot::Personal(records) => {
                let lists = build_personal_lists(records);
                let users = lists.len();
                self.personal
                    .set(lists)
                    .map_err(|_| AppError::AlreadyLoaded(kind.to_string()))?;
                users
            }
            OfflineSnapshot::Default(records) => {
                let list = build_default_list(records);
                let items = list.len();
                self.default
                    .set(list)
                    .map_err(|_| AppError::AlreadyLoaded(kind.to_string()))?;
                info!(items, "Default list size");
                1
            }
        };

        info!(kind = %kind, loaded, "Loaded");
        Ok(loaded)
    }

    pub fn is_ready(&self) -> bool {
        self.personal.get().is_some() && self.default.get().is_some()
    }

    /// Personalization requires a present and non-empty list.
    pub fn lookup(&self, user_id: UserId) -> Result<OfflineLookup<'_>> {
        let personal = self
            .personal
            .get()
            .ok_or_else(|| AppError::CatalogUnready(SnapshotKind::Personal.to_string()))?;

        Ok(match personal.get(&user_id) {
            Some(list) if !list.is_empty() => OfflineLookup::Found(list),
            _ => OfflineLookup::UseDefault,
        })
    }

    /// The user's personal list truncated to `k`, or the default list when there is none.
    pub fn get(&self, user_id: UserId, k: usize) -> Result<RankedList> {
        match self.lookup(user_id)? {
            OfflineLookup::Found(list) => {
                self.personal_hits.fetch_add(1, Ordering::Relaxed);
                metrics::record_offline_hit(OfflineHit::Personal);
                Ok(list.iter().take(k).copied().collect())
            }
            OfflineLookup::UseDefault => self.default_list(k),
        }
    }

    pub fn default_list(&self, k: usize) -> Result<RankedList> {
        let list = self
            .default
            .get()
            .ok_or_else(|| AppError::CatalogUnready(SnapshotKind::Default.to_string()))?;

        self.default_hits.fetch_add(1, Ordering::Relaxed);
        metrics::record_offline_hit(OfflineHit::Default);
        Ok(list.iter().take(k).copied().collect())
    }

    pub fn stats(&self) -> UsageStats {
        UsageStats {
            personal_hits: self.personal_hits.load(Ordering::Relaxed),
            default_hits: self.default_hits.load(Ordering::Relaxed),
        }
    }
}

fn build_personal_lists(records: Vec<PersonalRecord>) -> HashMap<UserId, RankedList> {
    let mut grouped: HashMap<UserId, Vec<(i64, ItemId)>> = HashMap::new();
    for record in records {
        grouped
            .entry(record.user_id)
            .or_default()
            .push((record.rank, record.item_id));
    }

    grouped
        .into_iter()
        .map(|(user_id, ranked)| (user_id, into_ranked_list(ranked)))
        .collect()
}

fn build_default_list(records: Vec<DefaultRecord>) -> RankedList {
    into_ranked_list(records.into_iter().map(|r| (r.rank, r.item_id)).collect())
}

/// Rank ascending, stable for equal ranks, first occurrence of each item kept.
fn into_ranked_list(mut ranked: Vec<(i64, ItemId)>) -> RankedList {
    ranked.sort_by_key(|(rank, _)| *rank);
    let mut seen = HashSet::with_capacity(ranked.len());
    ranked
        .into_iter()
        .filter_map(|(_, item_id)| seen.insert(item_id).then_some(item_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personal(user_id: UserId, item_id: ItemId, rank: i64) -> PersonalRecord {
        PersonalRecord {
            user_id,
            item_id,
            rank,
        }
    }

    fn default_records(items: &[ItemId]) -> Vec<DefaultRecord> {
        items
            .iter()
            .enumerate()
            .map(|(rank, &item_id)| DefaultRecord {
                item_id,
                rank: rank as i64 + 1,
            })
            .collect()
    }

    fn loaded_catalog() -> OfflineCatalog {
        let catalog = OfflineCatalog::new();
        catalog
            .load(OfflineSnapshot::Personal(vec![
                personal(1, 103, 3),
                personal(1, 101, 1),
                personal(1, 102, 2),
                personal(2, 201, 1),
            ]))
            .unwrap();
        catalog
            .load(OfflineSnapshot::Default(default_records(&[900, 901, 902])))
            .unwrap();
        catalog
    }

    #[test]
    fn test_personal_list_in_rank_order() {
        let catalog = loaded_catalog();
        assert!(catalog.is_ready());
        assert_eq!(catalog.get(1, 10).unwrap(), vec![101, 102, 103]);
        assert_eq!(catalog.get(1, 2).unwrap(), vec![101, 102]);
    }

    #[test]
    fn test_unknown_user_falls_back_to_default() {
        let catalog = loaded_catalog();
        assert_eq!(catalog.get(77, 2).unwrap(), catalog.default_list(2).unwrap());
        assert_eq!(catalog.get(77, 2).unwrap(), vec![900, 901]);
    }

    #[test]
    fn test_lookup_is_tagged() {
        let catalog = loaded_catalog();
        assert_eq!(
            catalog.lookup(2).unwrap(),
            OfflineLookup::Found(&[201][..])
        );
        assert_eq!(catalog.lookup(3).unwrap(), OfflineLookup::UseDefault);
    }

    #[test]
    fn test_stats_count_hits() {
        let catalog = loaded_catalog();
        catalog.get(1, 10).unwrap();
        catalog.get(2, 10).unwrap();
        catalog.get(99, 10).unwrap();
        catalog.default_list(5).unwrap();

        assert_eq!(
            catalog.stats(),
            UsageStats {
                personal_hits: 2,
                default_hits: 2,
            }
        );
    }

    #[test]
    fn test_rank_ties_and_duplicates() {
        let catalog = OfflineCatalog::new();
        catalog
            .load(OfflineSnapshot::Personal(vec![
                personal(1, 5, 2),
                personal(1, 6, 2),
                personal(1, 4, 1),
                personal(1, 5, 3),
            ]))
            .unwrap();
        catalog
            .load(OfflineSnapshot::Default(default_records(&[1, 2, 1, 3])))
            .unwrap();

        assert_eq!(catalog.get(1, 10).unwrap(), vec![4, 5, 6]);
        assert_eq!(catalog.default_list(10).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_query_before_load_is_unready() {
        let catalog = OfflineCatalog::new();
        assert!(!catalog.is_ready());
        assert!(matches!(catalog.get(1, 10), Err(AppError::CatalogUnready(_))));
        assert!(matches!(catalog.default_list(10), Err(AppError::CatalogUnready(_))));

        catalog
            .load(OfflineSnapshot::Personal(vec![personal(1, 10, 1)]))
            .unwrap();
        // Personal hit works without the default list, fallback does not
        assert_eq!(catalog.get(1, 10).unwrap(), vec![10]);
        assert!(matches!(catalog.get(2, 10), Err(AppError::CatalogUnready(_))));
    }

    #[test]
    fn test_second_load_rejected() {
        let catalog = loaded_catalog();
        let err = catalog
            .load(OfflineSnapshot::Default(default_records(&[1])))
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyLoaded(_)));
        assert_eq!(catalog.default_list(1).unwrap(), vec![900]);
    }

    #[test]
    fn test_empty_default_list() {
        let catalog = OfflineCatalog::new();
        catalog.load(OfflineSnapshot::Personal(Vec::new())).unwrap();
        catalog.load(OfflineSnapshot::Default(Vec::new())).unwrap();
        assert!(catalog.is_ready());
        assert!(catalog.get(1, 10).unwrap().is_empty());
    }
}
