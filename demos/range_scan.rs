//! # Range Scan Example
//!
//! Walks a store by prefix and by half-open range, edits it mid-walk, and
//! shares it between threads.

use std::ops::ControlFlow;
use std::thread;

use judystore::{Query, SharedStore, SortedStore, WriteBatch};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Range Scan Example ===\n");

    prefix_and_range()?;
    edit_while_walking()?;
    shared_store()?;

    Ok(())
}

fn prefix_and_range() -> Result<(), Box<dyn std::error::Error>> {
    println!("1. Prefix and Range Queries");
    println!("---------------------------");

    let mut store = SortedStore::new();
    let mut batch = WriteBatch::new();
    for day in 1..=31 {
        batch.put(format!("log:2024-01-{:02}", day), day * 10);
    }
    batch.put("log:2024-02-01", 320);
    store.apply(batch)?;

    let january = store.find(Query::prefix("log:2024-01"))?;
    println!("January entries: {}", january.len());

    // start positions the walk, max ends it (exclusive)
    for entry in store.scan(Query::range("log:2024-01-29", "log:2024-02")) {
        let entry = entry?;
        println!("  {} => {}", entry.key, entry.value);
    }
    println!();
    Ok(())
}

fn edit_while_walking() -> Result<(), Box<dyn std::error::Error>> {
    println!("2. Editing During for_each");
    println!("--------------------------");

    let mut store = SortedStore::new();
    for (key, count) in [("job:a", 0), ("job:b", 3), ("job:c", 0), ("job:d", 7)] {
        store.put(key, count)?;
    }

    // drop finished jobs and mark the rest as seen
    store.for_each(Query::prefix("job:"), |store, key, value| {
        if value.as_i64() == Some(0) {
            store.delete(key);
        } else {
            store.put(&format!("seen:{}", key), true)?;
        }
        Ok(ControlFlow::Continue(()))
    })?;

    for entry in store.find(Query::all())? {
        println!("  {} => {}", entry.key, entry.value);
    }

    let removed = store.delete_all(Query::prefix("seen:"));
    println!("Removed {:?}\n", removed);
    Ok(())
}

fn shared_store() -> Result<(), Box<dyn std::error::Error>> {
    println!("3. Shared Store");
    println!("---------------");

    let store = SharedStore::new();
    let mut handles = vec![];

    for t in 0..4 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                if let Err(e) = store.put(&format!("t{}:{:03}", t, i), i) {
                    eprintln!("put failed: {}", e);
                }
            }
        }));
    }

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("writer thread panicked");
        }
    }

    println!("Total entries: {}", store.size());
    println!("Thread 2 entries: {}", store.find(Query::prefix("t2:"))?.len());
    Ok(())
}
