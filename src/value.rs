//! JSON text encoding of stored values.
//!
//! Every value is kept as its compact JSON text and parsed back on read, so
//! a put/get cycle is lossless under JSON equality. The text lives in a
//! shared immutable buffer: dropping the last handle (on overwrite or
//! delete) releases it.

use std::collections::TryReserveError;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

/// Maximum nesting of arrays and objects accepted by `put`.
///
/// Kept below serde_json's parser recursion limit so every stored value is
/// guaranteed to decode again.
pub const MAX_NESTING_DEPTH: usize = 100;

/// A value encoded as JSON text.
///
/// Cloning is cheap: clones share the same buffer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncodedValue(Arc<String>);

impl EncodedValue {
    /// Encodes `value`, refusing values deeper than [`MAX_NESTING_DEPTH`]
    /// or larger than `max_size` bytes once encoded.
    ///
    /// Values that cannot fit are refused before encoding when their size
    /// lower bound already exceeds `max_size`, and otherwise as soon as the
    /// output passes it. The buffer only ever grows through `try_reserve`;
    /// failure to reserve is reported as [`Error::Allocation`].
    pub fn encode(value: &Value, max_size: usize) -> Result<Self> {
        let depth = nesting_depth(value);
        if depth > MAX_NESTING_DEPTH {
            return Err(Error::invalid_argument(format!(
                "value nesting depth {} exceeds {}",
                depth, MAX_NESTING_DEPTH
            )));
        }

        let hint = size_hint(value);
        if hint > max_size {
            return Err(too_large(hint, max_size));
        }

        let mut out = CappedBuffer::new(max_size);
        out.buf.try_reserve(hint)?;
        if let Err(err) = serde_json::to_writer(&mut out, value) {
            return Err(match out.overflow.take() {
                Some(Overflow::Limit(attempted)) => too_large(attempted, max_size),
                Some(Overflow::Reserve(reserve_err)) => reserve_err.into(),
                None => err.into(),
            });
        }

        let mut buf = out.buf;
        if buf.capacity() > buf.len() {
            let mut exact = Vec::new();
            exact.try_reserve_exact(buf.len())?;
            exact.extend_from_slice(&buf);
            buf = exact;
        }

        // serde_json only ever writes valid UTF-8
        let text = String::from_utf8(buf).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(Self(Arc::new(text)))
    }

    /// Parses the stored text back into a JSON value.
    pub fn decode(&self) -> Result<Value> {
        serde_json::from_str(&self.0)
            .map_err(|e| Error::corruption(format!("stored value failed to parse: {}", e)))
    }

    /// Parses the stored text into any deserializable type.
    pub fn decode_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.0)?)
    }

    /// Returns the JSON text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length of the JSON text in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: the shortest JSON text is one byte long.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedValue({})", &self.0)
    }
}

impl fmt::Display for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns how deeply arrays and objects nest inside `value`.
///
/// Scalars have depth 0. Walks iteratively so hostile inputs cannot
/// overflow the stack.
pub fn nesting_depth(value: &Value) -> usize {
    let mut max_depth = 0;
    let mut stack: Vec<(&Value, usize)> = vec![(value, 0)];

    while let Some((current, depth)) = stack.pop() {
        match current {
            Value::Array(items) => {
                max_depth = max_depth.max(depth + 1);
                stack.extend(items.iter().map(|v| (v, depth + 1)));
            }
            Value::Object(map) => {
                max_depth = max_depth.max(depth + 1);
                stack.extend(map.values().map(|v| (v, depth + 1)));
            }
            _ => {}
        }
    }

    max_depth
}

fn too_large(size: usize, max_size: usize) -> Error {
    Error::allocation(format!(
        "encoded value of at least {} bytes exceeds max_value_size {}",
        size, max_size
    ))
}

/// Lower bound on the encoded length, looking one level deep.
///
/// Used to refuse oversized values before encoding and to pre-size the
/// buffer.
fn size_hint(value: &Value) -> usize {
    match value {
        Value::Null | Value::Bool(true) => 4,
        Value::Bool(false) => 5,
        Value::Number(_) => 1,
        Value::String(s) => s.len() + 2,
        // "[0,0]": one byte per item plus separators
        Value::Array(items) => (items.len() * 2).max(1) + 1,
        // {"k":0,...}: quotes, colon and value per entry plus separators
        Value::Object(map) => {
            let keys: usize = map.keys().map(String::len).sum();
            (keys + map.len() * 5).max(1) + 1
        }
    }
}

/// Why a [`CappedBuffer`] refused a write.
#[derive(Debug)]
enum Overflow {
    /// The write would have grown the buffer to this many bytes.
    Limit(usize),
    Reserve(TryReserveError),
}

/// Encoding sink that grows with `try_reserve` and stops at `limit` bytes.
struct CappedBuffer {
    buf: Vec<u8>,
    limit: usize,
    overflow: Option<Overflow>,
}

impl CappedBuffer {
    fn new(limit: usize) -> Self {
        Self { buf: Vec::new(), limit, overflow: None }
    }
}

impl Write for CappedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let wanted = self.buf.len().saturating_add(data.len());
        if wanted > self.limit {
            self.overflow = Some(Overflow::Limit(wanted));
            return Err(io::Error::other("max_value_size exceeded"));
        }
        if let Err(err) = self.buf.try_reserve(data.len()) {
            self.overflow = Some(Overflow::Reserve(err));
            return Err(io::Error::new(io::ErrorKind::OutOfMemory, "value buffer reservation failed"));
        }
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
