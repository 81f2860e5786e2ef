//! BTreeMap-based backend.

use std::collections::BTreeMap;
use std::ops::Bound;

use super::OrderedBackend;
use crate::value::EncodedValue;

/// Ordered backend on top of `std::collections::BTreeMap`.
///
/// The default backend of [`SortedStore`](crate::SortedStore).
#[derive(Debug, Clone, Default)]
pub struct BTreeBackend {
    map: BTreeMap<String, EncodedValue>,
}

impl BTreeBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn seek(&self, bound: Bound<&str>) -> Option<(String, EncodedValue)> {
        self.map
            .range::<str, _>((bound, Bound::Unbounded))
            .next()
            .map(|(key, value)| (key.clone(), value.clone()))
    }
}

impl OrderedBackend for BTreeBackend {
    fn insert(&mut self, key: String, value: EncodedValue) -> Option<EncodedValue> {
        self.map.insert(key, value)
    }

    fn get(&self, key: &str) -> Option<EncodedValue> {
        self.map.get(key).cloned()
    }

    fn remove(&mut self, key: &str) -> Option<EncodedValue> {
        self.map.remove(key)
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
