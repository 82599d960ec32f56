use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type ItemId = i64;

/// Item identifiers ordered best-first, without duplicates.
pub type RankedList = Vec<ItemId>;

/// One neighbour of a source item in the similarity table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEntry {
    pub source: ItemId,
    pub candidate: ItemId,
    pub score: f64,
}

/// `(item_id, score)` pair as returned by a similarity lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarItem {
    pub item_id: ItemId,
    pub score: f64,
}

impl From<SimilarityEntry> for SimilarItem {
    fn from(entry: SimilarityEntry) -> Self {
        Self {
            item_id: entry.candidate,
            score: entry.score,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub personal_hits: u64,
    pub default_hits: u64,
}

// ============================================
// Snapshot records
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PersonalRecord {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rank: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DefaultRecord {
    pub item_id: ItemId,
    pub rank: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SimilarityRecord {
    #[serde(rename = "item_id_1")]
    pub source: ItemId,
    #[serde(rename = "item_id_2")]
    pub candidate: ItemId,
    pub score: f64,
}

// ============================================
// Wire types
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecsResponse {
    pub recs: RankedList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutResponse {
    pub result: String,
}

impl PutResponse {
    pub fn ok() -> Self {
        Self {
            result: "ok".to_string(),
        }
    }
}

/// Columnar similar-items payload (`item_id_2` and `score` are parallel arrays)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarItemsResponse {
    pub item_id_2: Vec<ItemId>,
    pub score: Vec<f64>,
}

impl SimilarItemsResponse {
    /// Zips the columns back into pairs; extra values in the longer column are dropped.
    pub fn into_items(self) -> Vec<SimilarItem> {
        self.item_id_2
            .into_iter()
            .zip(self.score)
            .map(|(item_id, score)| SimilarItem { item_id, score })
            .collect()
    }
}

impl From<Vec<SimilarItem>> for SimilarItemsResponse {
    fn from(items: Vec<SimilarItem>) -> Self {
        let (item_id_2, score) = items.into_iter().map(|i| (i.item_id, i.score)).unzip();
        Self { item_id_2, score }
    }
}
