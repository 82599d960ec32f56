use crate::models::{ItemId, RankedList};
use std::collections::HashSet;

/// Blend offline and online lists into at most `k` items.
///
/// Offline items take even positions and online items odd positions for as
/// long as both lists last; the rest of the longer list follows in order.
/// Duplicates are then dropped, keeping the earliest position.
///
/// With an empty online list the result is the offline list truncated to `k`.
pub fn blend(offline: &[ItemId], online: &[ItemId], k: usize) -> RankedList {
    let mut recs = dedup_ids(interleave(offline, online));
    recs.truncate(k);
    recs
}

/// `[offline[0], online[0], offline[1], online[1], ..]` followed by the remainder.
pub fn interleave(offline: &[ItemId], online: &[ItemId]) -> Vec<ItemId> {
    let shared = offline.len().min(online.len());
    let mut merged = Vec::with_capacity(offline.len() + online.len());

    for (off, on) in offline.iter().zip(online) {
        merged.push(*off);
        merged.push(*on);
    }

    let remainder = if offline.len() >= online.len() {
        &offline[shared..]
    } else {
        &online[shared..]
    };
    merged.extend_from_slice(remainder);

    merged
}

/// Drop repeated identifiers, keeping the first occurrence.
pub fn dedup_ids<I>(ids: I) -> RankedList
where
    I: IntoIterator<Item = ItemId>,
{
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
