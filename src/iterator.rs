//! Ordered iteration over a store.
//!
//! [`Scan`] walks the entries selected by a [`Query`] in ascending key
//! order while borrowing the store immutably, decoding each value.
//! [`RawScan`] walks the same entries but hands back the stored JSON text.
//! Neither keeps a position into the backend: each step seeks to the first
//! key after the one it last returned.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{BTreeBackend, OrderedBackend};
use crate::query::Query;
use crate::value::EncodedValue;
use crate::{Result, SortedStore};

/// One key/value pair read from a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The entry's key.
    pub key: String,
    /// The entry's decoded value.
    pub value: Value,
}

impl Entry {
    /// Creates an entry.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Splits the entry into its key and value.
    pub fn into_pair(self) -> (String, Value) {
        (self.key, self.value)
    }
}

/// A lazy, ordered iterator over the entries matched by a [`Query`].
///
/// Yields `Err` only if a stored value fails to decode.
///
/// # Example
///
/// ```rust
/// use judystore::{Query, SortedStore};
///
/// # fn main() -> Result<(), judystore::Error> {
/// let mut store = SortedStore::new();
/// store.put("user:1", "ada")?;
/// store.put("user:2", "grace")?;
/// store.put("zone:1", "eu")?;
///
/// for entry in store.scan(Query::prefix("user:")) {
///     let entry = entry?;
///     println!("{} => {}", entry.key, entry.value);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Scan<'a, B: OrderedBackend = BTreeBackend> {
    raw: RawScan<'a, B>,
}

impl<'a, B: OrderedBackend> Scan<'a, B> {
    pub(crate) fn new(store: &'a SortedStore<B>, query: Query<'a>) -> Self {
        Self { raw: RawScan::new(store, query) }
    }

    /// Returns the query this scan evaluates.
    pub fn query(&self) -> Query<'a> {
        self.raw.query
    }
}

impl<B: OrderedBackend> Iterator for Scan<'_, B> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|(key, raw)| raw.decode().map(|value| Entry { key, value }))
    }
}

impl<B: OrderedBackend> FusedIterator for Scan<'_, B> {}

/// Like [`Scan`], but yields each value as its stored JSON text.
///
/// Nothing is parsed, so this never fails.
pub struct RawScan<'a, B: OrderedBackend = BTreeBackend> {
    store: &'a SortedStore<B>,
    query: Query<'a>,
    /// Last key returned, `None` before the first step
    last: Option<String>,
    done: bool,
}

impl<'a, B: OrderedBackend> RawScan<'a, B> {
    pub(crate) fn new(store: &'a SortedStore<B>, query: Query<'a>) -> Self {
        Self { store, query, last: None, done: false }
    }

    /// Returns the query this scan evaluates.
    pub fn query(&self) -> Query<'a> {
        self.query
    }
}

impl<B: OrderedBackend> Iterator for RawScan<'_, B> {
    type Item = (String, EncodedValue);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let backend = self.store.backend();
        let found = match &self.last {
            None => backend.first_from(self.query.start()),
            Some(last) => backend.next_after(last),
        };

        match found {
            Some((key, raw)) if self.query.accepts(&key) => {
                self.last = Some(key.clone());
                Some((key, raw))
            }
            _ => {
                self.done = true;
                None
            }
        }
    }
}

impl<B: OrderedBackend> FusedIterator for RawScan<'_, B> {}
