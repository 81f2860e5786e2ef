// Boundary Condition Tests for JudyStore
// These tests verify behavior at edge cases and limits

use judystore::value::MAX_NESTING_DEPTH;
use judystore::{Error, Options, Query, SortedStore};
use serde_json::{json, Value};

/// Test operations on a completely empty store
#[test]
fn test_empty_store_operations() {
    let mut store = SortedStore::new();

    assert_eq!(store.get("nonexistent").unwrap(), None);
    assert!(!store.delete("nonexistent"));
    assert!(store.find(Query::all()).unwrap().is_empty());
    assert!(store.delete_all(Query::all()).is_empty());
    assert_eq!(store.size(), 0);
    assert!(store.is_empty());
    assert_eq!(store.first("").unwrap(), None);
}

/// Test the empty string as a key
#[test]
fn test_empty_key() {
    let mut store = SortedStore::new();
    store.put("a", 1).unwrap();
    store.put("", "empty").unwrap();

    assert_eq!(store.get("").unwrap(), Some(json!("empty")));
    // the empty key sorts first
    let keys: Vec<String> = store.find(Query::all()).unwrap().into_iter().map(|e| e.key).collect();
    assert_eq!(keys, ["", "a"]);
    assert!(store.find(Query::prefix("a")).unwrap().iter().all(|e| !e.key.is_empty()));
    assert!(store.delete(""));
}

/// Test byte-wise ordering of non-ASCII keys
#[test]
fn test_unicode_key_ordering() {
    let mut store = SortedStore::new();
    for key in ["z", "é", "e", "日本", "E", "ée"] {
        store.put(key, key).unwrap();
    }

    let keys: Vec<String> = store.find(Query::all()).unwrap().into_iter().map(|e| e.key).collect();
    // UTF-8 byte order: ASCII first, then 0xC3 (é), then 0xE6 (日)
    assert_eq!(keys, ["E", "e", "z", "é", "ée", "日本"]);

    let prefixed: Vec<String> =
        store.find(Query::prefix("é")).unwrap().into_iter().map(|e| e.key).collect();
    assert_eq!(prefixed, ["é", "ée"]);
}

/// Test numeric-looking keys sort as text
#[test]
fn test_numeric_keys_sort_lexically() {
    let mut store = SortedStore::new();
    for i in [1, 2, 10, 20, 100] {
        store.put(&i.to_string(), i).unwrap();
    }

    let keys: Vec<String> = store.find(Query::all()).unwrap().into_iter().map(|e| e.key).collect();
    assert_eq!(keys, ["1", "10", "100", "2", "20"]);

    // "100" < "2" lexically, so it is inside the range
    let ranged: Vec<String> =
        store.find(Query::range("1", "2")).unwrap().into_iter().map(|e| e.key).collect();
    assert_eq!(ranged, ["1", "10", "100"]);
}

/// Test keys with NUL bytes are rejected before touching the store
#[test]
fn test_nul_key_rejected() {
    let mut store = SortedStore::new();
    store.put("a", 1).unwrap();

    let err = store.put("a\0", 2).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(store.size(), 1);
    assert_eq!(store.get("a").unwrap(), Some(json!(1)));

    // lookups of such keys simply miss
    assert_eq!(store.get("a\0").unwrap(), None);
    assert!(!store.delete("a\0"));
}

/// Test maximum key size handling
#[test]
fn test_maximum_key_size() {
    let mut store = SortedStore::new();

    let large_key = "k".repeat(64 * 1024);
    store.put(&large_key, "value").unwrap();
    assert_eq!(store.get(&large_key).unwrap(), Some(json!("value")));

    let too_large = "k".repeat(64 * 1024 + 1);
    assert!(matches!(store.put(&too_large, "value"), Err(Error::InvalidArgument(_))));
}

/// Test large value handling
#[test]
fn test_large_value() {
    let mut store = SortedStore::new();

    let large_value = "v".repeat(10 * 1024 * 1024);
    store.put("large", large_value.clone()).unwrap();
    assert_eq!(store.get("large").unwrap(), Some(Value::String(large_value)));
}

/// Test the value size limit reports an allocation failure
#[test]
fn test_value_size_limit() {
    let mut store = SortedStore::with_options(Options::new().max_value_size(16)).unwrap();

    store.put("small", "0123456789").unwrap();
    let err = store.put("big", "0123456789abcdefgh").unwrap_err();
    assert!(err.is_allocation());
    assert!(!store.contains_key("big"));
}

/// Test nesting depth limits
#[test]
fn test_nesting_depth_limit() {
    let mut store = SortedStore::new();

    let mut deepest = json!(null);
    for _ in 0..MAX_NESTING_DEPTH {
        deepest = json!({ "child": deepest });
    }
    store.put("deep", deepest.clone()).unwrap();
    assert_eq!(store.get("deep").unwrap(), Some(deepest.clone()));

    let too_deep = json!([deepest]);
    assert!(matches!(store.put("deeper", too_deep), Err(Error::InvalidArgument(_))));
}

/// Test many keys stay ordered and countable
#[test]
fn test_many_keys() {
    let mut store = SortedStore::new();

    for i in (0..10_000).rev() {
        store.put(&format!("key{:05}", i), i).unwrap();
    }
    assert_eq!(store.size(), 10_000);

    let entries = store.find(Query::all()).unwrap();
    assert!(entries.windows(2).all(|w| w[0].key < w[1].key));
    assert_eq!(entries[0].value, json!(0));

    let ranged = store.find(Query::range("key01000", "key02000")).unwrap();
    assert_eq!(ranged.len(), 1000);

    assert_eq!(store.delete_all(Query::prefix("key0")).len(), 10_000);
    assert!(store.is_empty());
}

/// Test floating point values survive the text encoding exactly
#[test]
fn test_float_precision() {
    let mut store = SortedStore::new();
    for (i, f) in [0.1, 1.0 / 3.0, f64::MAX, f64::MIN_POSITIVE, -0.0, 1e300].iter().enumerate() {
        let key = format!("f{}", i);
        store.put(&key, *f).unwrap();
        assert_eq!(store.get_as::<f64>(&key).unwrap(), Some(*f));
    }
}

/// Test non-finite floats are stored as null, as JSON has no encoding for them
#[test]
fn test_non_finite_float() {
    let mut store = SortedStore::new();
    store.put("nan", f64::NAN).unwrap();
    assert_eq!(store.get("nan").unwrap(), Some(Value::Null));
}

/// Test the smallest value size limit still admits one-byte values
#[test]
fn test_one_byte_value_limit() {
    let mut store = SortedStore::with_options(Options::new().max_value_size(1)).unwrap();

    store.put("digit", 7).unwrap();
    assert_eq!(store.get("digit").unwrap(), Some(json!(7)));

    assert!(store.put("null", Value::Null).unwrap_err().is_allocation());
    assert!(store.put("two", 10).unwrap_err().is_allocation());
    assert_eq!(store.size(), 1);
}
