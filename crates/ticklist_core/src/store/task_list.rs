//! Task list store: in-memory state machine plus persistence wiring.
//!
//! # Responsibility
//! - Own the ordered task collection, the pending-removal window, and the
//!   single active edit session.
//! - Mirror the collection to the injected snapshot port after every
//!   mutation, sequenced strictly after the in-memory change.
//!
//! # Invariants
//! - Task ids are unique within the collection; new tasks prepend.
//! - A pending id keeps its task present and queryable until `tick`
//!   completes the removal, exactly once per accepted `begin_remove`.
//! - At most one edit session exists; completing a removal tears down a
//!   session targeting the removed id in the same transition.
//! - No operation surfaces an error to callers: bad input is a silent
//!   no-op and persistence failures are absorbed here.
//!
//! # See also
//! - docs/architecture/state-machine.md

use crate::model::task::{normalize_text, Task, TaskId};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::snapshot::{self, SNAPSHOT_KEY};
use crate::store::removal::RemovalQueue;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Removal window matching the presentation layer's leave animation.
pub const DEFAULT_REMOVAL_DELAY: Duration = Duration::from_millis(180);

/// Store construction options.
///
/// `editing` models the capability difference between the two shipped
/// list variants: with it off, edit operations are silent no-ops and the
/// store behaves as the plain add/complete list.
#[derive(Debug, Clone)]
pub struct TaskListConfig {
    /// How long a task stays pending before its removal completes.
    pub removal_delay: Duration,
    /// Whether in-place rename is available.
    pub editing: bool,
}

impl Default for TaskListConfig {
    fn default() -> Self {
        Self {
            removal_delay: DEFAULT_REMOVAL_DELAY,
            editing: true,
        }
    }
}

/// In-progress rename: target id plus a draft buffer the presentation
/// layer updates keystroke by keystroke. Independent of the task's
/// committed text until `commit_edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    task_id: TaskId,
    draft: String,
}

impl EditSession {
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }
}

/// Single-owner store for one task list.
///
/// All mutations run on the caller's thread; the only deferred element is
/// the removal window, driven by the host polling [`TaskListStore::tick`].
pub struct TaskListStore<R: SnapshotRepository> {
    repo: R,
    config: TaskListConfig,
    tasks: Vec<Task>,
    removals: RemovalQueue,
    edit: Option<EditSession>,
}

impl<R: SnapshotRepository> TaskListStore<R> {
    /// Builds a store over the given port and restores the persisted
    /// collection once.
    ///
    /// Restore fails closed: a missing slot, unreadable storage, or a
    /// malformed payload all yield an empty collection and never an error.
    /// Transient state (pending removals, edit session) always starts
    /// empty; every restored task is active.
    pub fn new(repo: R, config: TaskListConfig) -> Self {
        let tasks = restore(&repo);
        Self {
            repo,
            config,
            tasks,
            removals: RemovalQueue::new(),
            edit: None,
        }
    }

    /// Current collection in display order, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Active edit session, when the editing capability is on and a rename
    /// is in progress.
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Whether `id` sits inside its removal window.
    pub fn is_removing(&self, id: TaskId) -> bool {
        self.removals.contains(id)
    }

    /// Ids currently inside their removal window, in scheduling order.
    pub fn pending_removals(&self) -> Vec<TaskId> {
        self.removals.ids()
    }

    /// Earliest instant a pending removal falls due, for hosts that
    /// schedule their next `tick` instead of polling every frame.
    pub fn next_removal_due(&self) -> Option<Instant> {
        self.removals.next_due()
    }

    /// Adds a task from raw input.
    ///
    /// Trims the input first; empty or whitespace-only input is a silent
    /// no-op returning `None`. Otherwise prepends a task with a fresh
    /// unique id, persists, and returns the id so the presentation layer
    /// can clear its input buffer.
    pub fn add(&mut self, raw_text: &str) -> Option<TaskId> {
        let text = normalize_text(raw_text)?;
        let task = Task::new(text);
        let id = task.id;
        self.tasks.insert(0, task);
        self.persist();
        debug!("event=task_add module=store status=ok id={id} count={}", self.tasks.len());
        Some(id)
    }

    /// Starts the removal window for `id`.
    ///
    /// Returns `false` without rescheduling when `id` is already pending.
    /// The task stays in the collection until the window elapses and
    /// [`TaskListStore::tick`] completes the removal; scheduling is not
    /// cancelable and there is no undo. Scheduling is keyed by id alone:
    /// an id absent from the collection completes later as a no-op.
    pub fn begin_remove(&mut self, id: TaskId) -> bool {
        let due_at = Instant::now() + self.config.removal_delay;
        if !self.removals.schedule(id, due_at) {
            return false;
        }
        debug!("event=task_remove_begin module=store status=ok id={id}");
        true
    }

    /// Completes every removal whose window has elapsed.
    ///
    /// The host drives this from its event loop (or schedules it via
    /// [`TaskListStore::next_removal_due`]). Returns the removed tasks in
    /// completion order so the host can re-render. Each completed removal
    /// persists individually, keeping the one-write-per-mutation
    /// sequencing.
    pub fn tick(&mut self) -> Vec<Task> {
        let due = self.removals.take_due(Instant::now());
        let mut removed = Vec::new();
        for id in due {
            if let Some(task) = self.complete_remove(id) {
                removed.push(task);
            }
        }
        removed
    }

    /// Opens an edit session targeting `id`.
    ///
    /// Replaces any existing session. The draft starts from the text the
    /// presentation layer displayed, not from a collection lookup, so the
    /// session is self-contained even while `id` is pending removal.
    /// Silent no-op when the editing capability is off.
    pub fn begin_edit(&mut self, id: TaskId, current_text: &str) {
        if !self.config.editing {
            return;
        }
        self.edit = Some(EditSession {
            task_id: id,
            draft: current_text.to_string(),
        });
    }

    /// Replaces the draft buffer of the active session.
    ///
    /// No-op without a session; the targeted task's committed text is
    /// untouched until commit.
    pub fn set_edit_draft(&mut self, draft: &str) {
        if let Some(session) = self.edit.as_mut() {
            session.draft = draft.to_string();
        }
    }

    /// Commits the active edit session.
    ///
    /// No-op without a session. A draft that trims to empty discards the
    /// session without touching the task (same outcome as cancel).
    /// Otherwise the target task's text is replaced with the trimmed
    /// draft, every other task and all ordering stay untouched, and the
    /// collection persists. Returns whether a task text was written.
    pub fn commit_edit(&mut self) -> bool {
        let Some(session) = self.edit.take() else {
            return false;
        };
        let Some(text) = normalize_text(&session.draft) else {
            return false;
        };
        let Some(task) = self
            .tasks
            .iter_mut()
            .find(|task| task.id == session.task_id)
        else {
            return false;
        };
        task.text = text;
        let id = session.task_id;
        self.persist();
        debug!("event=task_edit_commit module=store status=ok id={id}");
        true
    }

    /// Drops any active edit session without mutating the collection.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// The deferred half of a removal. Session teardown and the drop from
    /// the collection happen in one transition; the write runs only when a
    /// task was actually removed.
    fn complete_remove(&mut self, id: TaskId) -> Option<Task> {
        if matches!(&self.edit, Some(session) if session.task_id == id) {
            self.edit = None;
        }
        let index = self.tasks.iter().position(|task| task.id == id)?;
        let task = self.tasks.remove(index);
        self.persist();
        debug!("event=task_remove_commit module=store status=ok id={id} count={}", self.tasks.len());
        Some(task)
    }

    /// Mirrors the collection to the slot, absorbing any failure: the
    /// in-memory state stays authoritative for the session either way.
    fn persist(&self) {
        let payload = match snapshot::encode_tasks(&self.tasks) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("event=snapshot_persist module=store status=error stage=encode error={err}");
                return;
            }
        };
        if let Err(err) = self.repo.save(SNAPSHOT_KEY, &payload) {
            warn!("event=snapshot_persist module=store status=error stage=save error={err}");
        }
    }
}

/// One-shot startup restore; failures collapse to an empty collection.
fn restore<R: SnapshotRepository>(repo: &R) -> Vec<Task> {
    let raw = match repo.load(SNAPSHOT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=list_restore module=store status=empty");
            return Vec::new();
        }
        Err(err) => {
            warn!("event=list_restore module=store status=error stage=load error={err}");
            return Vec::new();
        }
    };
    match snapshot::decode_tasks(&raw) {
        Ok(tasks) => {
            info!(
                "event=list_restore module=store status=ok count={}",
                tasks.len()
            );
            tasks
        }
        Err(err) => {
            warn!("event=list_restore module=store status=error stage=decode error={err}");
            Vec::new()
        }
    }
}
