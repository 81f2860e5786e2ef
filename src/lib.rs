//! # JudyStore - A Sorted Store of JSON Values
//!
//! JudyStore is an ordered map from string keys to JSON values with the
//! query surface of a JudySL array: exact lookup, overwrite-on-put,
//! delete, and ascending iteration bounded either by a key prefix or by an
//! exclusive upper key.
//!
//! ## Architecture
//!
//! - **SortedStore**: the store and its operations
//! - **Backend**: the ordered map entries live in (BTreeMap or SkipList)
//! - **EncodedValue**: values kept as compact JSON text, parsed on read
//! - **Query**: the prefix / range selection policy
//! - **WriteBatch**: all-or-nothing multi-key writes
//! - **SharedStore**: a lock-guarded handle for multi-threaded callers
//!
//! ## Example Usage
//!
//! ```rust
//! use judystore::{Query, SortedStore};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), judystore::Error> {
//! let mut store = SortedStore::new();
//!
//! // Write operations
//! store.put("cow", 42)?;
//! store.put("moo", json!({"sound": "moo"}))?;
//! store.put("moocow", json!([1, 2, 3]))?;
//!
//! // Read operations
//! assert_eq!(store.get("cow")?, Some(json!(42)));
//! assert_eq!(store.get("blank")?, None);
//!
//! // Ordered prefix query
//! let keys: Vec<String> = store.find(Query::prefix("moo"))?.into_iter().map(|e| e.key).collect();
//! assert_eq!(keys, ["moo", "moocow"]);
//!
//! // Delete operations
//! assert!(store.delete("cow"));
//! assert!(!store.delete("cow"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Module declarations
pub mod backend;
pub mod config;
pub mod dump;
pub mod error;
pub mod iterator;
pub mod query;
pub mod shared;
pub mod value;
pub mod write_batch;

// Re-exports
pub use backend::{BTreeBackend, OrderedBackend};
#[cfg(feature = "skiplist")]
pub use backend::SkipListBackend;
pub use config::Options;
pub use error::{Error, Result};
pub use iterator::{Entry, RawScan, Scan};
pub use query::Query;
pub use shared::SharedStore;
pub use value::EncodedValue;
pub use write_batch::{WriteBatch, WriteOp};

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Bookkeeping bytes charged per entry on top of key and value text.
pub const ENTRY_OVERHEAD: usize = 16;

/// An ordered map from string keys to JSON values.
///
/// Keys are ordered byte-wise. Values are stored as JSON text and parsed
/// back on every read, so anything that round-trips through JSON can be
/// stored.
///
/// # Thread Safety
///
/// `SortedStore` has no internal locking; mutation takes `&mut self`.
/// Wrap it in a [`SharedStore`] to share it across threads.
///
/// # Example
///
/// ```rust
/// use judystore::SortedStore;
/// use serde_json::json;
///
/// # fn main() -> Result<(), judystore::Error> {
/// let mut store = SortedStore::new();
/// store.put("key", json!(null))?;
///
/// // a stored null is not the same as a missing key
/// assert_eq!(store.get("key")?, Some(json!(null)));
/// assert_eq!(store.get("other")?, None);
/// # Ok(())
/// # }
/// ```
pub struct SortedStore<B: OrderedBackend = BTreeBackend> {
    /// Ordered map holding the entries
    backend: B,

    /// Limits applied to writes
    options: Options,

    /// Approximate bytes held (keys + encoded values + per-entry overhead)
    approximate_size: usize,
}

impl SortedStore<BTreeBackend> {
    /// Creates an empty store with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given options.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the options fail validation.
    pub fn with_options(options: Options) -> Result<Self> {
        Self::with_backend(options)
    }
}

impl<B: OrderedBackend> Default for SortedStore<B> {
    fn default() -> Self {
        Self { backend: B::default(), options: Options::default(), approximate_size: 0 }
    }
}

impl<B: OrderedBackend> SortedStore<B> {
    /// Creates an empty store on a chosen backend.
    ///
    /// # Example
    ///
    /// ```rust
    /// # #[cfg(feature = "skiplist")]
    /// # fn main() -> Result<(), judystore::Error> {
    /// use judystore::{Options, SkipListBackend, SortedStore};
    ///
    /// let mut store: SortedStore<SkipListBackend> = SortedStore::with_backend(Options::default())?;
    /// store.put("k", "v")?;
    /// assert_eq!(store.size(), 1);
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "skiplist"))]
    /// # fn main() {}
    /// ```
    pub fn with_backend(options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self { backend: B::default(), options, approximate_size: 0 })
    }

    /// Inserts a key-value pair, overwriting any existing value.
    ///
    /// The previous value, if any, is dropped.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the key contains a NUL byte, is longer than
    ///   `max_key_size`, or the value nests too deeply
    /// - `Allocation` if the store cannot grow to hold the entry, either
    ///   because memory could not be reserved or because a configured
    ///   limit would be exceeded
    ///
    /// On error the store is unchanged.
    pub fn put(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.put_value(key, &value)
    }

    /// Inserts any serializable value, converting it to JSON first.
    pub fn put_serialized<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.put_value(key, &value)
    }

    /// Inserts a borrowed JSON value.
    pub fn put_value(&mut self, key: &str, value: &Value) -> Result<()> {
        self.validate_key(key)?;
        let encoded = EncodedValue::encode(value, self.options.max_value_size)?;
        self.insert_encoded(key, encoded)
    }

    /// Retrieves the value stored at `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist. A stored JSON `null`
    /// comes back as `Ok(Some(Value::Null))`.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.backend.get(key).map(|raw| raw.decode()).transpose()
    }

    /// Retrieves the value stored at `key` as a concrete type.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.backend.get(key).map(|raw| raw.decode_as()).transpose()
    }

    /// Returns the stored JSON text of `key` without parsing it.
    pub fn get_raw(&self, key: &str) -> Option<EncodedValue> {
        self.backend.get(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.backend.get(key).is_some()
    }

    /// Removes `key`.
    ///
    /// Returns `true` if an entry was removed, `false` if the key did not
    /// exist (in which case the store is unchanged).
    pub fn delete(&mut self, key: &str) -> bool {
        match self.backend.remove(key) {
            Some(old) => {
                self.approximate_size -= entry_size(key, old.len());
                log::trace!("Deleted key {:?}", key);
                true
            }
            None => false,
        }
    }

    /// Returns all entries matched by `query`, in ascending key order.
    pub fn find(&self, query: Query<'_>) -> Result<Vec<Entry>> {
        self.scan(query).collect()
    }

    /// Returns a lazy iterator over the entries matched by `query`.
    pub fn scan<'a>(&'a self, query: Query<'a>) -> Scan<'a, B> {
        Scan::new(self, query)
    }

    /// Returns a lazy iterator over the matched keys and their stored JSON
    /// text, without decoding any value.
    pub fn scan_raw<'a>(&'a self, query: Query<'a>) -> RawScan<'a, B> {
        RawScan::new(self, query)
    }

    /// Calls `handler` for each entry matched by `query`, in ascending key
    /// order.
    ///
    /// The handler receives the store itself and may put or delete any key,
    /// including the current one. After each call the next key is looked up
    /// afresh as the smallest key strictly greater than the one just
    /// visited, so the walk always reflects the live contents: keys
    /// inserted ahead of the cursor are visited, keys deleted ahead of it
    /// are not, and no key is visited twice.
    ///
    /// Returning `ControlFlow::Break(())` ends the iteration early. An
    /// error from the handler ends it as well and is returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use judystore::{Query, SortedStore};
    /// use std::ops::ControlFlow;
    ///
    /// # fn main() -> Result<(), judystore::Error> {
    /// let mut store = SortedStore::new();
    /// for key in ["a", "b", "c"] {
    ///     store.put(key, 1)?;
    /// }
    ///
    /// let mut seen = Vec::new();
    /// store.for_each(Query::all(), |store, key, _value| {
    ///     seen.push(key.to_string());
    ///     store.delete(key);
    ///     Ok(ControlFlow::Continue(()))
    /// })?;
    ///
    /// assert_eq!(seen, ["a", "b", "c"]);
    /// assert!(store.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn for_each<F>(&mut self, query: Query<'_>, mut handler: F) -> Result<()>
    where
        F: FnMut(&mut Self, &str, Value) -> Result<ControlFlow<()>>,
    {
        let mut cursor = self.backend.first_from(query.start());

        while let Some((key, raw)) = cursor {
            if !query.accepts(&key) {
                break;
            }

            let value = raw.decode()?;
            if handler(self, &key, value)?.is_break() {
                break;
            }

            cursor = self.backend.next_after(&key);
        }

        Ok(())
    }

    /// Deletes every entry matched by `query`.
    ///
    /// Returns the deleted keys in ascending order.
    pub fn delete_all(&mut self, query: Query<'_>) -> Vec<String> {
        let mut deleted = Vec::new();
        let mut cursor = self.backend.first_from(query.start()).map(|(key, _)| key);

        while let Some(key) = cursor {
            if !query.accepts(&key) {
                break;
            }

            self.delete(&key);
            cursor = self.backend.next_after(&key).map(|(next, _)| next);
            deleted.push(key);
        }

        log::debug!("delete_all removed {} entries, {} remain", deleted.len(), self.size());
        deleted
    }

    /// Returns the number of entries.
    pub fn size(&self) -> usize {
        self.backend.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    /// Returns the approximate size of the store in bytes.
    ///
    /// Counts key bytes, encoded value bytes and [`ENTRY_OVERHEAD`] per
    /// entry. This is the figure `Options::memory_limit` is checked against.
    pub fn approximate_size(&self) -> usize {
        self.approximate_size
    }

    /// Returns the entry with the smallest key `>= start`.
    pub fn first(&self, start: &str) -> Result<Option<Entry>> {
        self.backend.first_from(start).map(decode_entry).transpose()
    }

    /// Returns the entry with the smallest key `> key`.
    ///
    /// `key` need not be present in the store.
    pub fn next_after(&self, key: &str) -> Result<Option<Entry>> {
        self.backend.next_after(key).map(decode_entry).transpose()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        let removed = self.backend.len();
        self.backend.clear();
        self.approximate_size = 0;
        log::debug!("Cleared {} entries", removed);
    }

    /// Applies a batch of writes atomically.
    ///
    /// Every operation is validated and encoded, and the store limits are
    /// checked against the state the whole batch produces, before anything
    /// is written. If any of that fails, the store is left unchanged.
    pub fn apply(&mut self, batch: WriteBatch) -> Result<()> {
        // Phase 1: validate and encode
        let mut prepared: Vec<(String, Option<EncodedValue>)> = Vec::with_capacity(batch.len());
        for op in batch.into_operations() {
            match op {
                WriteOp::Put { key, value } => {
                    self.validate_key(&key)?;
                    let encoded = EncodedValue::encode(&value, self.options.max_value_size)?;
                    prepared.push((key, Some(encoded)));
                }
                WriteOp::Delete { key } => prepared.push((key, None)),
            }
        }

        // Phase 2: compute the final state of every touched key and check limits
        let mut final_state: BTreeMap<&str, Option<usize>> = BTreeMap::new();
        for (key, value) in &prepared {
            final_state.insert(key.as_str(), value.as_ref().map(EncodedValue::len));
        }

        let mut entries = self.backend.len();
        let mut size = self.approximate_size;
        for (key, after) in &final_state {
            if let Some(before) = self.backend.get(key) {
                entries -= 1;
                size -= entry_size(key, before.len());
            }
            if let Some(len) = after {
                entries += 1;
                size += entry_size(key, *len);
            }
        }
        self.check_limits(entries, size)?;

        // Phase 3: write
        let operations = prepared.len();
        for (key, value) in prepared {
            match value {
                Some(encoded) => {
                    self.backend.insert(key, encoded);
                }
                None => {
                    self.backend.remove(&key);
                }
            }
        }
        self.approximate_size = size;

        log::debug!("Applied batch of {} operations, store now holds {} entries", operations, entries);
        Ok(())
    }

    /// Returns the options this store was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    /// Rejects keys that cannot be stored.
    fn validate_key(&self, key: &str) -> Result<()> {
        if key.as_bytes().contains(&0) {
            return Err(Error::invalid_argument("key must not contain NUL bytes"));
        }
        if key.len() > self.options.max_key_size {
            return Err(Error::invalid_argument(format!(
                "key of {} bytes exceeds max_key_size {}",
                key.len(),
                self.options.max_key_size
            )));
        }
        Ok(())
    }

    /// Inserts an already encoded value after checking the store limits.
    fn insert_encoded(&mut self, key: &str, encoded: EncodedValue) -> Result<()> {
        let previous = self.backend.get(key).map(|old| old.len());

        let entries = self.backend.len() + usize::from(previous.is_none());
        let size = self.approximate_size - previous.map_or(0, |len| entry_size(key, len))
            + entry_size(key, encoded.len());
        self.check_limits(entries, size)?;

        let mut owned_key = String::new();
        owned_key.try_reserve_exact(key.len())?;
        owned_key.push_str(key);

        self.backend.insert(owned_key, encoded);
        self.approximate_size = size;

        log::trace!("Put key {:?} (overwrite: {})", key, previous.is_some());
        Ok(())
    }

    /// Fails with `Allocation` if the store may not grow to `entries` / `size`.
    fn check_limits(&self, entries: usize, size: usize) -> Result<()> {
        if let Some(max) = self.options.max_entries {
            if entries > max {
                log::warn!("Write rejected: {} entries would exceed max_entries {}", entries, max);
                return Err(Error::allocation(format!("store is limited to {} entries", max)));
            }
        }
        if let Some(limit) = self.options.memory_limit {
            if size > limit {
                log::warn!("Write rejected: {} bytes would exceed memory_limit {}", size, limit);
                return Err(Error::allocation(format!("store is limited to {} bytes", limit)));
            }
        }
        Ok(())
    }
}

/// Bytes charged for an entry with the given key and encoded value length.
fn entry_size(key: &str, value_len: usize) -> usize {
    key.len() + value_len + ENTRY_OVERHEAD
}

fn decode_entry((key, raw): (String, EncodedValue)) -> Result<Entry> {
    Ok(Entry { key, value: raw.decode()? })
}

impl<B: OrderedBackend> std::fmt::Debug for SortedStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortedStore")
            .field("entries", &self.size())
            .field("approximate_size", &self.approximate_size)
            .field("options", &self.options)
            .finish()
    }
}
