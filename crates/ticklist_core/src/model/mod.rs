//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//! - Keep one record shape shared by in-memory state and the snapshot.
//!
//! # Invariants
//! - Every domain object is identified by a stable `TaskId`.
//! - Removal is deferred and then final; there is no tombstone state.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod task;
