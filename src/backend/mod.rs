//! # Ordered backends
//!
//! The store keeps its entries in an ordered map behind the
//! [`OrderedBackend`] trait. Any map that supports insert/overwrite, exact
//! lookup, removal and forward seeking from a key can sit underneath a
//! [`SortedStore`](crate::SortedStore).
//!
//! ## Backends
//!
//! - [`BTreeBackend`]: `std::collections::BTreeMap`, the default
//! - [`SkipListBackend`]: `crossbeam_skiplist::SkipMap` (feature `skiplist`)
//!
//! ## Cursor model
//!
//! Iteration never holds a cursor into the map. Callers ask for the first
//! key at or after a start key, then repeatedly for the first key strictly
//! after the last one they saw. Each step is resolved against the map as it
//! is at that moment, so mutations between steps are always observed.

mod btree;
#[cfg(feature = "skiplist")]
mod skiplist;

pub use btree::BTreeBackend;
#[cfg(feature = "skiplist")]
pub use skiplist::SkipListBackend;

use crate::value::EncodedValue;

/// An ordered string-keyed map holding encoded values.
///
/// Keys are compared byte-wise, which for `str` is the derived `Ord`.
pub trait OrderedBackend: Default {
    /// Inserts or overwrites `key`, returning the previous value if any.
    fn insert(&mut self, key: String, value: EncodedValue) -> Option<EncodedValue>;

    /// Returns the value stored at exactly `key`.
    fn get(&self, key: &str) -> Option<EncodedValue>;

    /// Removes `key`, returning its value if it was present.
    fn remove(&mut self, key: &str) -> Option<EncodedValue>;

    /// Returns the entry with the smallest key `>= start`.
    fn first_from(&self, start: &str) -> Option<(String, EncodedValue)>;

    /// Returns the entry with the smallest key `> key`.
    fn next_after(&self, key: &str) -> Option<(String, EncodedValue)>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the backend holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    fn clear(&mut self);
}
