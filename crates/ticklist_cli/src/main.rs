//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ticklist_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use std::error::Error;

use ticklist_core::db::open_db_in_memory;
use ticklist_core::{SqliteSnapshotRepository, TaskListConfig, TaskListStore};

fn main() {
    println!("ticklist_core ping={}", ticklist_core::ping());
    println!("ticklist_core version={}", ticklist_core::core_version());

    match store_smoke() {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(err) => println!("store smoke failed: {err}"),
    }
}

/// Exercises the store end to end against an in-memory slot. Output must
/// stay free of generated ids so repeated runs compare byte-for-byte.
fn store_smoke() -> Result<Vec<String>, Box<dyn Error>> {
    let conn = open_db_in_memory()?;
    let repo = SqliteSnapshotRepository::try_new(&conn)?;
    let mut store = TaskListStore::new(repo, TaskListConfig::default());

    store
        .add("write the smoke probe")
        .ok_or("probe input was rejected")?;
    store
        .add("run the smoke probe")
        .ok_or("probe input was rejected")?;

    let mut lines = vec![format!("store smoke tasks={}", store.tasks().len())];
    lines.extend(
        store
            .tasks()
            .iter()
            .map(|task| format!("store smoke text={}", task.text)),
    );
    Ok(lines)
}
