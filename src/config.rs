//! Configuration options for the JudyStore sorted store.

/// Default maximum key size in bytes (64KB).
pub const DEFAULT_MAX_KEY_SIZE: usize = 64 * 1024;

/// Default maximum encoded value size in bytes (64MB).
pub const DEFAULT_MAX_VALUE_SIZE: usize = 64 * 1024 * 1024;

/// Configuration options for a store.
///
/// Limits that are exceeded by a write make that write fail with
/// [`Error::Allocation`](crate::Error::Allocation), the same error raised
/// when memory for an entry cannot be reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of entries the store may hold.
    /// Default: None (unbounded)
    pub max_entries: Option<usize>,

    /// Upper bound on the approximate size of the store in bytes
    /// (keys plus encoded values).
    /// Default: None (unbounded)
    pub memory_limit: Option<usize>,

    /// Maximum key size in bytes. Longer keys are rejected as invalid.
    /// Default: 64KB
    pub max_key_size: usize,

    /// Maximum size of a single encoded value in bytes.
    /// Default: 64MB
    pub max_value_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_entries: None,
            memory_limit: None,
            max_key_size: DEFAULT_MAX_KEY_SIZE,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
        }
    }
}

impl Options {
    /// Creates a new Options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of entries.
    pub fn max_entries(mut self, count: usize) -> Self {
        self.max_entries = Some(count);
        self
    }

    /// Sets the approximate memory limit in bytes.
    pub fn memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    /// Sets the maximum key size in bytes.
    pub fn max_key_size(mut self, size: usize) -> Self {
        self.max_key_size = size;
        self
    }

    /// Sets the maximum encoded value size in bytes.
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.max_value_size = size;
        self
    }

    /// Validates the options and returns an error if any are invalid.
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_entries == Some(0) {
            return Err(crate::Error::invalid_argument("max_entries must be > 0"));
        }
        if self.memory_limit == Some(0) {
            return Err(crate::Error::invalid_argument("memory_limit must be > 0"));
        }
        if self.max_key_size == 0 {
            return Err(crate::Error::invalid_argument("max_key_size must be > 0"));
        }
        // a single digit is the shortest encoded value
        if self.max_value_size == 0 {
            return Err(crate::Error::invalid_argument("max_value_size must be > 0"));
        }
        Ok(())
    }
}
