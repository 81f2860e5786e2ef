//! Lock-guarded store handle for multi-threaded callers.
//!
//! [`SortedStore`] itself is single-owner. `SharedStore` wraps one in an
//! `Arc<RwLock<_>>`: lookups and queries take the read lock, writes take the
//! write lock. Each call is atomic on its own; there is no ordering between
//! calls made from different threads.

use std::ops::ControlFlow;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::backend::{BTreeBackend, OrderedBackend};
use crate::{Entry, Options, Query, Result, SortedStore, WriteBatch};

/// A cloneable, thread-safe handle to a [`SortedStore`].
///
/// # Example
///
/// ```rust
/// use judystore::SharedStore;
/// use std::thread;
///
/// # fn main() -> Result<(), judystore::Error> {
/// let store = SharedStore::new();
///
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let store = store.clone();
///         thread::spawn(move || store.put(&format!("thread:{}", t), t))
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap()?;
/// }
///
/// assert_eq!(store.size(), 4);
/// # Ok(())
/// # }
/// ```
pub struct SharedStore<B: OrderedBackend = BTreeBackend> {
    inner: Arc<RwLock<SortedStore<B>>>,
}

impl SharedStore<BTreeBackend> {
    /// Creates an empty shared store with default options.
    pub fn new() -> Self {
        Self::from_store(SortedStore::new())
    }

    /// Creates an empty shared store with the given options.
    pub fn with_options(options: Options) -> Result<Self> {
        Ok(Self::from_store(SortedStore::with_options(options)?))
    }
}

impl Default for SharedStore<BTreeBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: OrderedBackend> Clone for SharedStore<B> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<B: OrderedBackend> From<SortedStore<B>> for SharedStore<B> {
    fn from(store: SortedStore<B>) -> Self {
        Self::from_store(store)
    }
}

impl<B: OrderedBackend> SharedStore<B> {
    /// Wraps an existing store.
    pub fn from_store(store: SortedStore<B>) -> Self {
        Self { inner: Arc::new(RwLock::new(store)) }
    }

    /// Inserts a key-value pair. See [`SortedStore::put`].
    pub fn put(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.inner.write().put(key, value)
    }

    /// Inserts any serializable value. See [`SortedStore::put_serialized`].
    pub fn put_serialized<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.inner.write().put_serialized(key, value)
    }

    /// Retrieves a value. See [`SortedStore::get`].
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.inner.read().get(key)
    }

    /// Retrieves a value as a concrete type. See [`SortedStore::get_as`].
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.inner.read().get_as(key)
    }

    /// Removes a key. See [`SortedStore::delete`].
    pub fn delete(&self, key: &str) -> bool {
        self.inner.write().delete(key)
    }

    /// Returns matching entries. See [`SortedStore::find`].
    pub fn find(&self, query: Query<'_>) -> Result<Vec<Entry>> {
        self.inner.read().find(query)
    }

    /// Visits matching entries with the write lock held for the whole walk.
    ///
    /// The handler gets the inner store and may mutate it directly; it must
    /// not call back into this `SharedStore`, which would deadlock.
    pub fn for_each<F>(&self, query: Query<'_>, handler: F) -> Result<()>
    where
        F: FnMut(&mut SortedStore<B>, &str, Value) -> Result<ControlFlow<()>>,
    {
        self.inner.write().for_each(query, handler)
    }

    /// Deletes matching entries. See [`SortedStore::delete_all`].
    pub fn delete_all(&self, query: Query<'_>) -> Vec<String> {
        self.inner.write().delete_all(query)
    }

    /// Applies a batch atomically. See [`SortedStore::apply`].
    pub fn apply(&self, batch: WriteBatch) -> Result<()> {
        self.inner.write().apply(batch)
    }

    /// Returns the number of entries.
    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Locks the store for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, SortedStore<B>> {
        self.inner.read()
    }

    /// Locks the store for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, SortedStore<B>> {
        self.inner.write()
    }
}

impl<B: OrderedBackend> std::fmt::Debug for SharedStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore").field("entries", &self.size()).finish()
    }
}
