//! Export and import of store contents as a single JSON object.
//!
//! The document maps every key to its value, keys in ascending order:
//!
//! ```text
//! {"0":"0","1":1,"40":{"nested":[4,0]}}
//! ```
//!
//! Values are written straight from their stored JSON text as
//! [`RawValue`]s, without being decoded into `Value`s first. Loading goes
//! through `put`, so keys and values are validated and the target store's
//! limits apply.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::de::{Deserialize, Deserializer, Error as DeError, MapAccess, Visitor};
use serde::ser::{Error as SerError, Serialize, SerializeMap, Serializer};
use serde_json::value::RawValue;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::backend::OrderedBackend;
use crate::{Options, Result, SortedStore};

impl<B: OrderedBackend> SortedStore<B> {
    /// Writes the store as one JSON object.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Reads a store from one JSON object, applying `options` to every entry.
    pub fn read_json<R: Read>(reader: R, options: Options) -> Result<Self> {
        let mut store = Self::with_backend(options)?;
        let entries: serde_json::Map<String, Value> = serde_json::from_reader(reader)?;

        for (key, value) in &entries {
            store.put_value(key, value)?;
        }

        log::debug!("Read {} entries from JSON", store.size());
        Ok(store)
    }

    /// Saves the store to a file.
    ///
    /// The document is written to a uniquely named temporary file in the
    /// same directory and renamed over `path` once synced, so an
    /// interrupted save never leaves a truncated file at `path` and no
    /// other file in the directory is touched.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.write_json(&mut writer)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        log::info!("Saved {} entries to {:?}", self.size(), path);
        Ok(())
    }

    /// Loads a store saved with [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P, options: Options) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let store = Self::read_json(BufReader::new(file), options)?;

        log::info!("Loaded {} entries from {:?}", store.size(), path);
        Ok(store)
    }
}

/// Serializes as a map from key to stored JSON text.
///
/// Each value is emitted as a [`RawValue`], which serde_json writes
/// verbatim. Other serializers see serde_json's raw-value wrapper instead of
/// the decoded value.
impl<B: OrderedBackend> Serialize for SortedStore<B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.size()))?;

        let mut cursor = self.backend().first_from("");
        while let Some((key, encoded)) = cursor {
            let raw: &RawValue = serde_json::from_str(encoded.as_str()).map_err(S::Error::custom)?;
            map.serialize_entry(&key, raw)?;
            cursor = self.backend().next_after(&key);
        }

        map.end()
    }
}

impl<'de, B: OrderedBackend> Deserialize<'de> for SortedStore<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(StoreVisitor(std::marker::PhantomData))
    }
}

struct StoreVisitor<B>(std::marker::PhantomData<B>);

impl<'de, B: OrderedBackend> Visitor<'de> for StoreVisitor<B> {
    type Value = SortedStore<B>;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map of string keys to JSON values")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> std::result::Result<Self::Value, M::Error> {
        let mut store = SortedStore::default();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            store.put_value(&key, &value).map_err(M::Error::custom)?;
        }
        Ok(store)
    }
}
