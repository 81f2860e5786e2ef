//! Basic usage example for JudyStore
//!
//! This example demonstrates the fundamental operations:
//! - Creating a store
//! - Writing JSON values under string keys
//! - Reading values back
//! - Prefix lookups
//! - Deleting keys

use judystore::{Options, Query, SortedStore};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    name: String,
    age: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    // Configure store limits
    let options = Options::default().max_entries(10_000).memory_limit(16 * 1024 * 1024); // 16MB

    let mut store = SortedStore::with_options(options)?;
    println!("Store created");

    // Write some values
    println!("Writing data...");
    store.put("config:theme", "dark")?;
    store.put("config:retries", 3)?;
    store.put("config:features", json!(["search", "export"]))?;
    store.put_serialized("user:ada", &User { name: "Ada".into(), age: 36 })?;

    // Read values
    println!("Reading data...");
    if let Some(theme) = store.get("config:theme")? {
        println!("config:theme => {}", theme);
    }
    if let Some(user) = store.get_as::<User>("user:ada")? {
        println!("user:ada => {:?}", user);
    }

    // Prefix lookup
    println!("All config entries:");
    for entry in store.find(Query::prefix("config:"))? {
        println!("  {} => {}", entry.key, entry.value);
    }

    // Delete a key
    println!("Deleting config:retries...");
    store.delete("config:retries");

    match store.get("config:retries")? {
        Some(_) => println!("config:retries still exists (unexpected)"),
        None => println!("config:retries was successfully deleted"),
    }

    println!("{} entries remain", store.size());
    Ok(())
}
