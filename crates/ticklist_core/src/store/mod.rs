//! Core list-store orchestration.
//!
//! # Responsibility
//! - Expose the single stateful entry point presentation layers call into.
//! - Keep UI hosts decoupled from storage and codec details.
//!
//! # See also
//! - docs/architecture/state-machine.md

pub mod removal;
pub mod task_list;
