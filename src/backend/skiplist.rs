//! SkipList-based backend.
//!
//! Uses crossbeam-skiplist. Lookups and seeks go through `lower_bound`,
//! which maps directly onto "first key at or after" and "first key after".

use std::fmt;
use std::ops::Bound;

use crossbeam_skiplist::SkipMap;

use super::OrderedBackend;
use crate::value::EncodedValue;

/// Ordered backend on top of `crossbeam_skiplist::SkipMap`.
#[derive(Default)]
pub struct SkipListBackend {
    map: SkipMap<String, EncodedValue>,
}

impl SkipListBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn seek(&self, bound: Bound<&str>) -> Option<(String, EncodedValue)> {
        self.map.lower_bound(bound).map(|entry| (entry.key().clone(), entry.value().clone()))
    }
}

impl OrderedBackend for SkipListBackend {
    fn insert(&mut self, key: String, value: EncodedValue) -> Option<EncodedValue> {
        // SkipMap::insert hands back the new entry, so read the old one first
        let previous = self.get(&key);
        self.map.insert(key, value);
        previous
    }

    fn get(&self, key: &str) -> Option<EncodedValue> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    fn remove(&mut self, key: &str) -> Option<EncodedValue> {
        self.map.remove(key).map(|entry| entry.value().clone())
    }

    fn first_from(&self, start: &str) -> Option<(String, EncodedValue)> {
        self.seek(Bound::Included(start))
    }

    fn next_after(&self, key: &str) -> Option<(String, EncodedValue)> {
        self.seek(Bound::Excluded(key))
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}

impl fmt::Debug for SkipListBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipListBackend").field("len", &self.map.len()).finish()
    }
}
