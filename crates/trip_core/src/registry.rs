//! Zone registry: maps pickup zone keys to dense, insertion-ordered indices.
//!
//! Keys are the raw bytes of the zone field. No encoding is assumed.

use std::collections::HashMap;
use std::sync::Arc;

/// Dense index of a zone within one ingest pass.
pub type ZoneIndex = usize;

/// Insertion-ordered set of zone names with O(1) lookup by name.
///
/// Each name is allocated once and shared between the lookup map and the
/// ordered name list. The first zone seen gets index 0.
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    index: HashMap<Arc<[u8]>, ZoneIndex>,
    names: Vec<Arc<[u8]>>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all zones, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.index.clear();
        self.names.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.index.reserve(additional);
        self.names.reserve(additional);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, zone: &[u8]) -> Option<ZoneIndex> {
        self.index.get(zone).copied()
    }

    /// Look up `zone`, registering it under the next free index if unseen.
    ///
    /// Returns the index and whether the zone was newly inserted. The name is
    /// only copied into owned storage on insertion.
    pub fn get_or_insert(&mut self, zone: &[u8]) -> (ZoneIndex, bool) {
        if let Some(&idx) = self.index.get(zone) {
            return (idx, false);
        }

        let idx = self.names.len();
        let name: Arc<[u8]> = Arc::from(zone);
        self.names.push(Arc::clone(&name));
        self.index.insert(name, idx);
        (idx, true)
    }

    /// Zone names in index order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.names.iter().map(|name| &**name)
    }
}
