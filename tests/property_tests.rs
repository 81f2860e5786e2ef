// Property Tests for JudyStore
// Compares the store against a BTreeMap model over generated workloads

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use judystore::{Query, SortedStore};
use proptest::prelude::*;
use serde_json::Value;

/// Keys from a small alphabet so prefixes and ranges overlap often
fn key_strategy() -> impl Strategy<Value = String> {
    "[0-4a-c]{0,4}"
}

fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e9..1.0e9f64).prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

#[derive(Debug, Clone)]
enum Op {
    Put(String, Value),
    Delete(String),
    DeleteAll(String, Option<String>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (key_strategy(), json_strategy()).prop_map(|(k, v)| Op::Put(k, v)),
        2 => key_strategy().prop_map(Op::Delete),
        1 => (key_strategy(), prop::option::of(key_strategy())).prop_map(|(p, m)| Op::DeleteAll(p, m)),
    ]
}

/// Reference evaluation of a query against the model
fn model_select<'a>(
    model: &'a BTreeMap<String, Value>,
    prefix: &str,
    max: Option<&str>,
) -> Vec<(&'a String, &'a Value)> {
    model
        .range(prefix.to_string()..)
        .take_while(|(k, _)| match max {
            None => k.starts_with(prefix),
            Some(max) => k.as_str() < max,
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_round_trip(key in key_strategy(), value in json_strategy()) {
        let mut store = SortedStore::new();
        store.put(&key, value.clone()).unwrap();
        prop_assert_eq!(store.get(&key).unwrap(), Some(value));
    }

    #[test]
    fn prop_matches_model(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut store = SortedStore::new();
        let mut model: BTreeMap<String, Value> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    store.put(&k, v.clone()).unwrap();
                    model.insert(k, v);
                }
                Op::Delete(k) => {
                    prop_assert_eq!(store.delete(&k), model.remove(&k).is_some());
                }
                Op::DeleteAll(prefix, max) => {
                    let expected: Vec<String> = model_select(&model, &prefix, max.as_deref())
                        .into_iter()
                        .map(|(k, _)| k.clone())
                        .collect();
                    for k in &expected {
                        model.remove(k);
                    }
                    let query = Query::from_parts(Some(prefix.as_str()), max.as_deref());
                    prop_assert_eq!(store.delete_all(query), expected);
                }
            }
            prop_assert_eq!(store.size(), model.len());
        }

        let all = store.find(Query::all()).unwrap();
        prop_assert_eq!(all.len(), store.size());
        let expected: Vec<(String, Value)> = model.into_iter().collect();
        let actual: Vec<(String, Value)> = all.into_iter().map(|e| e.into_pair()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_queries_match_model(
        keys in prop::collection::btree_set(key_strategy(), 0..40),
        prefix in key_strategy(),
        max in prop::option::of(key_strategy()),
    ) {
        let mut store = SortedStore::new();
        let mut model = BTreeMap::new();
        for k in &keys {
            store.put(k, k.as_str()).unwrap();
            model.insert(k.clone(), Value::from(k.as_str()));
        }

        let query = Query::from_parts(Some(prefix.as_str()), max.as_deref());
        let found: Vec<String> = store.find(query).unwrap().into_iter().map(|e| e.key).collect();
        let expected: Vec<String> = model_select(&model, &prefix, max.as_deref())
            .into_iter()
            .map(|(k, _)| k.clone())
            .collect();
        prop_assert_eq!(&found, &expected);

        // find is strictly ascending
        prop_assert!(found.windows(2).all(|w| w[0] < w[1]));

        // for_each visits the same keys
        let mut visited = Vec::new();
        store.for_each(query, |_, k, _| {
            visited.push(k.to_string());
            Ok(ControlFlow::Continue(()))
        }).unwrap();
        prop_assert_eq!(visited, expected);

        // an empty prefix is the same as no prefix
        prop_assert_eq!(store.find(Query::prefix("")).unwrap(), store.find(Query::all()).unwrap());
    }

    #[test]
    fn prop_delete_during_walk_visits_each_key_once(
        keys in prop::collection::btree_set(key_strategy(), 0..40),
        prefix in key_strategy(),
    ) {
        let mut store = SortedStore::new();
        for k in &keys {
            store.put(k, true).unwrap();
        }
        let before: Vec<String> =
            store.find(Query::prefix(&prefix)).unwrap().into_iter().map(|e| e.key).collect();

        let mut visited = Vec::new();
        store.for_each(Query::prefix(&prefix), |store, k, _| {
            store.delete(k);
            visited.push(k.to_string());
            Ok(ControlFlow::Continue(()))
        }).unwrap();

        prop_assert_eq!(visited, before);
        prop_assert!(store.find(Query::prefix(&prefix)).unwrap().is_empty());
    }
}

#[cfg(feature = "skiplist")]
mod backend_equivalence {
    use super::*;
    use judystore::{Options, SkipListBackend};

    proptest! {
        #[test]
        fn prop_backends_agree(ops in prop::collection::vec(op_strategy(), 0..60)) {
            let mut btree = SortedStore::new();
            let mut skiplist: SortedStore<SkipListBackend> =
                SortedStore::with_backend(Options::default()).unwrap();

            for op in ops {
                match op {
                    Op::Put(k, v) => {
                        btree.put(&k, v.clone()).unwrap();
                        skiplist.put(&k, v).unwrap();
                    }
                    Op::Delete(k) => {
                        prop_assert_eq!(btree.delete(&k), skiplist.delete(&k));
                    }
                    Op::DeleteAll(prefix, max) => {
                        let query = Query::from_parts(Some(prefix.as_str()), max.as_deref());
                        prop_assert_eq!(btree.delete_all(query), skiplist.delete_all(query));
                    }
                }
            }

            prop_assert_eq!(btree.find(Query::all()).unwrap(), skiplist.find(Query::all()).unwrap());
            prop_assert_eq!(btree.approximate_size(), skiplist.approximate_size());
        }
    }
}
