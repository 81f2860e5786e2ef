//! Key selection policy shared by `find`, `scan`, `for_each` and
//! `delete_all`.
//!
//! A query always starts at the smallest key greater than or equal to its
//! prefix. What happens next depends on whether an upper bound is given:
//!
//! - **prefix only**: iteration continues while keys start with the prefix.
//! - **prefix + max**: iteration continues while `key < max`, whether or not
//!   keys still share the prefix. The prefix only locates the first key.
//!
//! All comparisons are byte-wise on the UTF-8 key, never numeric:
//! `"40"` sorts after `"4"` and before `"5"`.

/// Selects a contiguous run of keys in ascending order.
///
/// # Example
///
/// ```rust
/// use judystore::{Query, SortedStore};
///
/// # fn main() -> Result<(), judystore::Error> {
/// let mut store = SortedStore::new();
/// for key in ["0", "1", "2", "3", "4", "40"] {
///     store.put(key, key)?;
/// }
///
/// let prefixed: Vec<String> =
///     store.find(Query::prefix("4"))?.into_iter().map(|e| e.key).collect();
/// assert_eq!(prefixed, ["4", "40"]);
///
/// let ranged: Vec<String> =
///     store.find(Query::range("1", "3"))?.into_iter().map(|e| e.key).collect();
/// assert_eq!(ranged, ["1", "2"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Query<'a> {
    prefix: &'a str,
    max: Option<&'a str>,
}

impl<'a> Query<'a> {
    /// Matches every key. Equivalent to `Query::prefix("")`.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches every key that starts with `prefix`.
    pub fn prefix(prefix: &'a str) -> Self {
        Self { prefix, max: None }
    }

    /// Matches keys from the first key `>= start` up to, but excluding, `max`.
    pub fn range(start: &'a str, max: &'a str) -> Self {
        Self { prefix: start, max: Some(max) }
    }

    /// Matches keys from the first key up to, but excluding, `max`.
    pub fn until(max: &'a str) -> Self {
        Self::range("", max)
    }

    /// Builds a query from optional arguments, the way callers of the
    /// untyped API pass them. A missing prefix matches everything.
    pub fn from_parts(prefix: Option<&'a str>, max: Option<&'a str>) -> Self {
        Self { prefix: prefix.unwrap_or(""), max }
    }

    /// The key iteration starts from.
    pub fn start(&self) -> &'a str {
        self.prefix
    }

    /// The exclusive upper bound, if any.
    pub fn max(&self) -> Option<&'a str> {
        self.max
    }

    /// Returns `true` while `key` is still inside the selection.
    ///
    /// Keys arrive in ascending order from `start()`, so the first key for
    /// which this returns `false` ends the iteration.
    pub fn accepts(&self, key: &str) -> bool {
        match self.max {
            None => key.starts_with(self.prefix),
            Some(max) => key < max,
        }
    }
}
