//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the snapshot persistence port the store is built against.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - The port moves opaque string payloads; snapshot shape is owned by the
//!   codec, never by an adapter.
//! - Adapters are rejected at construction when the expected schema is not
//!   in place.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod snapshot_repo;
