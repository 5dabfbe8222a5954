//! Snapshot codec for the persisted task collection.
//!
//! # Responsibility
//! - Serialize the full collection into the single-slot JSON payload.
//! - Decode stored payloads leniently: per-record shape validation drops
//!   bad elements instead of failing the whole restore.
//!
//! # Invariants
//! - The payload is a JSON array of `{ "id": string, "text": string }` in
//!   display order; there is no version field and no migration path.
//! - Decoding never panics; a payload that is not a JSON array is reported
//!   as an error for the caller to absorb.
//! - Decoded collections contain unique ids (duplicates keep the first
//!   occurrence).
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::task::{Task, TaskId};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Fixed key of the slot the serialized collection lives under.
pub const SNAPSHOT_KEY: &str = "tasks";

/// Codec error for whole-payload failures.
///
/// Per-record problems never surface here; they are handled by dropping
/// the offending record during decode.
#[derive(Debug)]
pub enum SnapshotError {
    /// Payload is not parseable JSON at all.
    Json(serde_json::Error),
    /// Payload parsed, but the top-level value is not an array.
    NotAnArray,
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::NotAnArray => write!(f, "persisted snapshot is not a JSON array"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::NotAnArray => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Serializes the full collection in display order.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(tasks)?)
}

/// Decodes a stored payload into the initial collection.
///
/// Validation is shape-level: each element must be an object carrying a
/// string `id` (parseable as a UUID) and a string `text`. Elements failing
/// that, and elements repeating an earlier id, are dropped silently. Order
/// of surviving records is preserved as stored.
///
/// # Errors
/// - [`SnapshotError::Json`] when the payload is not valid JSON.
/// - [`SnapshotError::NotAnArray`] when the top-level value has the wrong
///   shape. Both mean the whole payload is discarded by the caller.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, SnapshotError> {
    let parsed: Value = serde_json::from_str(raw)?;
    let entries = parsed.as_array().ok_or(SnapshotError::NotAnArray)?;

    let mut seen: HashSet<TaskId> = HashSet::new();
    let mut tasks = Vec::new();
    for entry in entries {
        if let Some(task) = task_from_value(entry) {
            if seen.insert(task.id) {
                tasks.push(task);
            }
        }
    }

    Ok(tasks)
}

fn task_from_value(value: &Value) -> Option<Task> {
    let id = Uuid::parse_str(value.get("id")?.as_str()?).ok()?;
    let text = value.get("text")?.as_str()?;
    Some(Task::with_id(id, text))
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, encode_tasks, SnapshotError};
    use crate::model::task::Task;
    use uuid::Uuid;

    fn fixed_task(id: &str, text: &str) -> Task {
        Task::with_id(Uuid::parse_str(id).unwrap(), text)
    }

    #[test]
    fn encode_produces_id_text_objects_in_order() {
        let tasks = vec![
            fixed_task("00000000-0000-4000-8000-000000000002", "walk dog"),
            fixed_task("00000000-0000-4000-8000-000000000001", "buy milk"),
        ];
        let payload = encode_tasks(&tasks).unwrap();
        assert_eq!(
            payload,
            "[{\"id\":\"00000000-0000-4000-8000-000000000002\",\"text\":\"walk dog\"},\
             {\"id\":\"00000000-0000-4000-8000-000000000001\",\"text\":\"buy milk\"}]"
        );
    }

    #[test]
    fn decode_roundtrips_encoded_collection() {
        let tasks = vec![
            fixed_task("00000000-0000-4000-8000-000000000002", "walk dog"),
            fixed_task("00000000-0000-4000-8000-000000000001", "buy milk"),
        ];
        let payload = encode_tasks(&tasks).unwrap();
        assert_eq!(decode_tasks(&payload).unwrap(), tasks);
    }

    #[test]
    fn decode_drops_records_missing_text() {
        let payload = "[{\"id\":\"00000000-0000-4000-8000-000000000001\",\"text\":\"kept\"},\
                       {\"id\":\"00000000-0000-4000-8000-000000000002\"}]";
        let tasks = decode_tasks(payload).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "kept");
    }

    #[test]
    fn decode_drops_records_with_non_string_fields() {
        let payload = "[{\"id\":42,\"text\":\"bad id\"},\
                       {\"id\":\"00000000-0000-4000-8000-000000000001\",\"text\":7},\
                       {\"id\":\"00000000-0000-4000-8000-000000000002\",\"text\":\"ok\"}]";
        let tasks = decode_tasks(payload).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "ok");
    }

    #[test]
    fn decode_drops_records_with_unparseable_id() {
        let payload = "[{\"id\":\"not-a-uuid\",\"text\":\"bad\"},\
                       {\"id\":\"00000000-0000-4000-8000-000000000001\",\"text\":\"ok\"}]";
        let tasks = decode_tasks(payload).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "ok");
    }

    #[test]
    fn decode_drops_non_object_elements() {
        let payload = "[\"plain string\", 12, null,\
                       {\"id\":\"00000000-0000-4000-8000-000000000001\",\"text\":\"ok\"}]";
        let tasks = decode_tasks(payload).unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn decode_keeps_first_record_on_duplicate_id() {
        let payload = "[{\"id\":\"00000000-0000-4000-8000-000000000001\",\"text\":\"first\"},\
                       {\"id\":\"00000000-0000-4000-8000-000000000001\",\"text\":\"second\"}]";
        let tasks = decode_tasks(payload).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "first");
    }

    #[test]
    fn decode_rejects_non_array_payload() {
        assert!(matches!(
            decode_tasks("{\"id\":\"x\"}"),
            Err(SnapshotError::NotAnArray)
        ));
    }

    #[test]
    fn decode_rejects_unparseable_payload() {
        assert!(matches!(decode_tasks("not json"), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn decode_accepts_empty_array() {
        assert!(decode_tasks("[]").unwrap().is_empty());
    }
}
