//! Exact top-k selection over zone and slot counters.
//!
//! Results are ordered by count descending, then zone ascending (byte order),
//! then hour ascending for slots. Selection partitions around the k-th element
//! and sorts only the kept prefix, which yields exactly the first k entries of
//! the fully sorted candidate list.
//!
//! Candidates carry raw zone bytes. Names are rendered as UTF-8 (lossily) only
//! for the entries that make it into a result.

use std::cmp::Ordering;

/// Trip total for one pickup zone.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ZoneCount {
    pub zone: String,
    pub count: u64,
}

impl ZoneCount {
    /// Ranking order: count descending, zone ascending.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        by_count_then_zone(self.count, self.zone.as_bytes(), other.count, other.zone.as_bytes())
    }
}

/// Trip total for one (zone, hour-of-day) slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SlotCount {
    pub zone: String,
    pub hour: u8,
    pub count: u64,
}

impl SlotCount {
    /// Ranking order: count descending, zone ascending, hour ascending.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        by_count_then_zone(self.count, self.zone.as_bytes(), other.count, other.zone.as_bytes())
            .then(self.hour.cmp(&other.hour))
    }
}

/// Keep the `k` smallest items under `compare`, returned in sorted order.
///
/// Equivalent to sorting all of `items` and truncating to `k`, provided
/// `compare` is a total order.
pub fn top_k_by<T, F>(mut items: Vec<T>, k: usize, mut compare: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if k == 0 {
        return Vec::new();
    }

    if items.len() > k {
        items.select_nth_unstable_by(k - 1, &mut compare);
        items.truncate(k);
    }
    items.sort_unstable_by(compare);
    items
}

/// Rank borrowed `(zone, count)` candidates, copying only the winners' names.
pub(crate) fn top_zones<'a, I>(candidates: I, k: usize) -> Vec<ZoneCount>
where
    I: Iterator<Item = (&'a [u8], u64)>,
{
    if k == 0 {
        return Vec::new();
    }

    let candidates: Vec<(&[u8], u64)> = candidates.collect();
    let ranked = top_k_by(candidates, k, |a, b| by_count_then_zone(a.1, a.0, b.1, b.0));

    ranked
        .into_iter()
        .map(|(zone, count)| ZoneCount {
            zone: zone_name(zone),
            count,
        })
        .collect()
}

/// Rank borrowed `(zone, hour, count)` candidates, copying only the winners' names.
pub(crate) fn top_slots<'a, I>(candidates: I, k: usize) -> Vec<SlotCount>
where
    I: Iterator<Item = (&'a [u8], u8, u64)>,
{
    if k == 0 {
        return Vec::new();
    }

    let candidates: Vec<(&[u8], u8, u64)> = candidates.collect();
    let ranked = top_k_by(candidates, k, |a, b| {
        by_count_then_zone(a.2, a.0, b.2, b.0).then(a.1.cmp(&b.1))
    });

    ranked
        .into_iter()
        .map(|(zone, hour, count)| SlotCount {
            zone: zone_name(zone),
            hour,
            count,
        })
        .collect()
}

fn by_count_then_zone(a_count: u64, a_zone: &[u8], b_count: u64, b_zone: &[u8]) -> Ordering {
    b_count.cmp(&a_count).then_with(|| a_zone.cmp(b_zone))
}

fn zone_name(zone: &[u8]) -> String {
    String::from_utf8_lossy(zone).into_owned()
}
