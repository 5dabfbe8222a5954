//! Deferred-removal queue.
//!
//! # Responsibility
//! - Track which task ids sit inside their removal window.
//! - Surface due entries to the store's `tick` without firing them itself.
//!
//! # Invariants
//! - One entry per task id; re-scheduling an already pending id is refused.
//! - Entries leave the queue exactly once, either via `take_due` or never
//!   (there is no cancel).
//! - `take_due` preserves scheduling order among entries due at the same
//!   poll.
//!
//! # See also
//! - docs/architecture/state-machine.md

use crate::model::task::TaskId;
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
struct RemovalEntry {
    task_id: TaskId,
    due_at: Instant,
}

/// Pending-removal window bookkeeping, owned by the list store.
#[derive(Debug, Default)]
pub struct RemovalQueue {
    entries: Vec<RemovalEntry>,
}

impl RemovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task_id` to fall due at `due_at`.
    ///
    /// Returns `false` without touching the queue when the id is already
    /// pending; this is the double-scheduling guard.
    pub fn schedule(&mut self, task_id: TaskId, due_at: Instant) -> bool {
        if self.contains(task_id) {
            return false;
        }
        self.entries.push(RemovalEntry { task_id, due_at });
        true
    }

    /// Whether `task_id` is inside its removal window.
    pub fn contains(&self, task_id: TaskId) -> bool {
        self.entries.iter().any(|entry| entry.task_id == task_id)
    }

    /// Drains every entry due at `now`, in scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<TaskId> {
        let mut due = Vec::new();
        self.entries.retain(|entry| {
            if entry.due_at <= now {
                due.push(entry.task_id);
                false
            } else {
                true
            }
        });
        due
    }

    /// Earliest due instant across pending entries.
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.due_at).min()
    }

    /// Pending ids in scheduling order.
    pub fn ids(&self) -> Vec<TaskId> {
        self.entries.iter().map(|entry| entry.task_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RemovalQueue;
    use std::time::{Duration, Instant};
    use uuid::Uuid;

    #[test]
    fn schedule_refuses_duplicate_id() {
        let mut queue = RemovalQueue::new();
        let id = Uuid::new_v4();
        let now = Instant::now();

        assert!(queue.schedule(id, now));
        assert!(!queue.schedule(id, now + Duration::from_secs(1)));
        assert_eq!(queue.ids(), vec![id]);
    }

    #[test]
    fn take_due_drains_only_entries_at_or_before_now() {
        let mut queue = RemovalQueue::new();
        let due_id = Uuid::new_v4();
        let waiting_id = Uuid::new_v4();
        let now = Instant::now();

        queue.schedule(due_id, now);
        queue.schedule(waiting_id, now + Duration::from_secs(3600));

        assert_eq!(queue.take_due(now), vec![due_id]);
        assert!(queue.contains(waiting_id));
        assert!(!queue.contains(due_id));
    }

    #[test]
    fn take_due_preserves_scheduling_order() {
        let mut queue = RemovalQueue::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let now = Instant::now();

        queue.schedule(first, now);
        queue.schedule(second, now);

        assert_eq!(queue.take_due(now), vec![first, second]);
        assert!(queue.is_empty());
    }

    #[test]
    fn next_due_reports_earliest_entry() {
        let mut queue = RemovalQueue::new();
        let now = Instant::now();
        let soon = now + Duration::from_millis(10);
        let later = now + Duration::from_secs(60);

        assert_eq!(queue.next_due(), None);
        queue.schedule(Uuid::new_v4(), later);
        queue.schedule(Uuid::new_v4(), soon);
        assert_eq!(queue.next_due(), Some(soon));
    }
}
