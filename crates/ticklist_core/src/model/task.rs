//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical record the list store owns and persists.
//! - Provide the input normalization rule shared by add and edit-commit.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `text` is non-empty and carries no leading/trailing whitespace once a
//!   task exists; `normalize_text` is the only gate that produces it.
//!
//! # See also
//! - docs/architecture/data-model.md

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for every task in a list.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Generated ids come from a cryptographically random UUID v4 source, so
/// fresh ids do not collide with ids already in a collection.
pub type TaskId = Uuid;

/// A single to-do record: stable identity plus display text.
///
/// The persisted snapshot serializes exactly these two fields, in this
/// order, so the struct doubles as the wire shape of one snapshot element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID used for removal scheduling and edit targeting.
    pub id: TaskId,
    /// Trimmed, non-empty display text.
    pub text: String,
}

impl Task {
    /// Creates a new task with a generated stable ID.
    ///
    /// Callers are expected to pass text that already went through
    /// [`normalize_text`]; the constructor does not re-validate.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), text)
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by snapshot decoding, where identity already exists in the
    /// stored record.
    pub fn with_id(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// Applies the single input rule of the list: trim, reject empty.
///
/// Returns `None` for input that is empty or whitespace-only after
/// trimming; callers treat that as a silent no-op, never an error.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
