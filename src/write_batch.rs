//! WriteBatch groups puts and deletes that must land together.
//!
//! [`SortedStore::apply`](crate::SortedStore::apply) validates and encodes
//! every operation, and checks the store's limits against the state the
//! whole batch would produce, before it touches a single entry. A batch
//! therefore either applies completely or leaves the store unchanged.
//!
//! # Example
//!
//! ```rust
//! use judystore::{SortedStore, WriteBatch};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), judystore::Error> {
//! let mut store = SortedStore::new();
//! store.put("cart:1", json!({"items": 2}))?;
//!
//! let mut batch = WriteBatch::new();
//! batch.put("cart:2", json!({"items": 5}));
//! batch.delete("cart:1");
//!
//! store.apply(batch)?;
//! assert_eq!(store.get("cart:1")?, None);
//! assert_eq!(store.get("cart:2")?, Some(json!({"items": 5})));
//! # Ok(())
//! # }
//! ```

use serde_json::Value;

/// Type of write operation in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Put operation with key and value
    Put {
        /// Key to insert or overwrite
        key: String,
        /// Value to store at the key
        value: Value,
    },
    /// Delete operation with key
    Delete {
        /// Key to delete
        key: String,
    },
}

impl WriteOp {
    /// Returns the key this operation targets.
    pub fn key(&self) -> &str {
        match self {
            WriteOp::Put { key, .. } | WriteOp::Delete { key } => key,
        }
    }
}

/// WriteBatch accumulates a sequence of write operations to be applied atomically.
///
/// Operations are applied in insertion order, so a later operation on the
/// same key wins.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    operations: Vec<WriteOp>,
}

impl WriteBatch {
    /// Creates a new empty WriteBatch.
    pub fn new() -> Self {
        Self { operations: Vec::new() }
    }

    /// Adds a Put operation to the batch.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.operations.push(WriteOp::Put { key: key.into(), value: value.into() });
    }

    /// Adds a Delete operation to the batch.
    pub fn delete(&mut self, key: impl Into<String>) {
        self.operations.push(WriteOp::Delete { key: key.into() });
    }

    /// Clears all operations from the batch.
    pub fn clear(&mut self) {
        self.operations.clear();
    }

    /// Returns the number of operations in the batch.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if the batch contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns an iterator over the operations in the batch.
    pub fn iter(&self) -> impl Iterator<Item = &WriteOp> {
        self.operations.iter()
    }

    pub(crate) fn into_operations(self) -> Vec<WriteOp> {
        self.operations
    }
}

impl Extend<WriteOp> for WriteBatch {
    fn extend<I: IntoIterator<Item = WriteOp>>(&mut self, iter: I) {
        self.operations.extend(iter);
    }
}
