//! Core domain logic for Ticklist.
//! This crate is the single source of truth for list-state invariants.
//!
//! A host UI embeds [`TaskListStore`] directly: raw input and task ids go
//! in, the collection and transient state render out. The host drives the
//! removal window by polling [`TaskListStore::tick`]. Persistence is
//! injected through [`SnapshotRepository`], so storage stays swappable and
//! the store never reaches into ambient globals.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod snapshot;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{normalize_text, Task, TaskId};
pub use repo::snapshot_repo::{
    RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository,
};
pub use snapshot::{decode_tasks, encode_tasks, SnapshotError, SNAPSHOT_KEY};
pub use store::task_list::{
    EditSession, TaskListConfig, TaskListStore, DEFAULT_REMOVAL_DELAY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
