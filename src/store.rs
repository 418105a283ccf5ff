//! The task store: an ordered in-memory collection with a small mutation API.
//!
//! Every mutation produces a brand-new snapshot (`Arc<Vec<Task>>`), so view
//! code can detect change with `Arc::ptr_eq` instead of deep comparison.
//! Each successful transition is mirrored to durable storage through a
//! [`StatePersister`]; persistence failures are logged and never surfaced,
//! so state stays correct in memory even when the disk is unhappy.
//!
//! Lookup-style mutations (`update`, `remove`, `toggle_status`, `set_status`)
//! are silent no-ops on unknown ids. `add` performs no uniqueness check on
//! `id`; callers supply fresh UUIDs.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};

use crate::error::Result;
use crate::task::{Task, TaskPatch, TaskStatus};

/// Durable-storage collaborator invoked after every successful transition.
///
/// Swappable so tests can run against memory while production writes the
/// JSON state file (`storage::JsonFileStore`).
pub trait StatePersister {
    /// Load prior state; `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<Vec<Task>>>;

    /// Persist the full ordered collection.
    fn save(&self, tasks: &[Task]) -> Result<()>;
}

/// In-memory persister for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryPersister;

impl StatePersister for MemoryPersister {
    fn load(&self) -> Result<Option<Vec<Task>>> {
        Ok(None)
    }

    fn save(&self, _tasks: &[Task]) -> Result<()> {
        Ok(())
    }
}

pub struct TaskStore {
    snapshot: Arc<Vec<Task>>,
    persister: Box<dyn StatePersister>,
}

impl TaskStore {
    /// Open a store, seeding from persisted state. Absent or unreadable
    /// state falls back to an empty collection.
    pub fn open(persister: Box<dyn StatePersister>) -> Self {
        let tasks = match persister.load() {
            Ok(Some(tasks)) => tasks,
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load persisted tasks, starting empty");
                Vec::new()
            }
        };
        Self {
            snapshot: Arc::new(tasks),
            persister,
        }
    }

    /// Ephemeral store backed by [`MemoryPersister`].
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryPersister))
    }

    /// Current snapshot. Cheap to clone; compare with `Arc::ptr_eq` to
    /// detect change.
    pub fn snapshot(&self) -> Arc<Vec<Task>> {
        Arc::clone(&self.snapshot)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.snapshot.iter().find(|task| task.id == id)
    }

    /// Insert at the head of the order (most-recently-added first), stamping
    /// `created_at` with the current time regardless of the caller's value.
    pub fn add(&mut self, mut task: Task) {
        task.created_at = Utc::now().timestamp_millis();
        let mut tasks = Vec::with_capacity(self.snapshot.len() + 1);
        tasks.push(task);
        tasks.extend(self.snapshot.iter().cloned());
        self.commit(tasks);
    }

    /// Merge `patch` into the task matching `id`, leaving unset fields and
    /// the collection order untouched.
    pub fn update(&mut self, id: &str, patch: TaskPatch) {
        let tasks = self
            .snapshot
            .iter()
            .cloned()
            .map(|mut task| {
                if task.id == id {
                    patch.apply(&mut task);
                }
                task
            })
            .collect();
        self.commit(tasks);
    }

    /// Remove the task matching `id`.
    pub fn remove(&mut self, id: &str) {
        let tasks = self
            .snapshot
            .iter()
            .filter(|task| task.id != id)
            .cloned()
            .collect();
        self.commit(tasks);
    }

    /// Flip between `completed` and everything else: a completed task goes
    /// back to pending, while pending *and overdue* tasks both become
    /// completed. The overdue mapping is deliberate.
    pub fn toggle_status(&mut self, id: &str) {
        let tasks = self
            .snapshot
            .iter()
            .cloned()
            .map(|mut task| {
                if task.id == id {
                    task.status = if task.status == TaskStatus::Completed {
                        TaskStatus::Pending
                    } else {
                        TaskStatus::Completed
                    };
                }
                task
            })
            .collect();
        self.commit(tasks);
    }

    /// Unconditionally overwrite the status of the task matching `id`.
    pub fn set_status(&mut self, id: &str, status: TaskStatus) {
        let tasks = self
            .snapshot
            .iter()
            .cloned()
            .map(|mut task| {
                if task.id == id {
                    task.status = status;
                }
                task
            })
            .collect();
        self.commit(tasks);
    }

    /// Replace the collection order with the sequence given by
    /// `ordered_ids`. Duplicate and unknown ids are dropped; tasks absent
    /// from the input keep their previous relative order and are appended
    /// after the named ones, so no task is ever lost.
    pub fn reorder(&mut self, ordered_ids: &[String]) {
        let mut named: HashSet<&str> = HashSet::with_capacity(ordered_ids.len());
        let mut tasks: Vec<Task> = Vec::with_capacity(self.snapshot.len());

        for id in ordered_ids {
            if !named.insert(id.as_str()) {
                continue;
            }
            if let Some(task) = self.snapshot.iter().find(|task| &task.id == id) {
                tasks.push(task.clone());
            }
        }
        for task in self.snapshot.iter() {
            if !named.contains(task.id.as_str()) {
                tasks.push(task.clone());
            }
        }

        self.commit(tasks);
    }

    /// Promote every pending task whose due date has passed to overdue.
    /// Idempotent; completed and already-overdue tasks are never touched.
    /// Returns the number of tasks promoted; commits only when non-zero.
    pub fn sweep_overdue(&mut self, now: NaiveDateTime) -> usize {
        let mut promoted = 0;
        let tasks: Vec<Task> = self
            .snapshot
            .iter()
            .cloned()
            .map(|mut task| {
                if task.status == TaskStatus::Pending && task.is_past_due(now) {
                    task.status = TaskStatus::Overdue;
                    promoted += 1;
                }
                task
            })
            .collect();
        if promoted > 0 {
            self.commit(tasks);
        }
        promoted
    }

    fn commit(&mut self, tasks: Vec<Task>) {
        self.snapshot = Arc::new(tasks);
        if let Err(err) = self.persister.save(&self.snapshot) {
            tracing::warn!(error = %err, "failed to persist task state");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::NaiveDate;

    use super::*;
    use crate::task::TaskPriority;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
    }

    fn task(id: &str, title: &str) -> Task {
        Task::new(id, title, "", date("2099-01-01"), TaskPriority::Medium)
    }

    fn ids(store: &TaskStore) -> Vec<&str> {
        store.tasks().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn add_inserts_at_head() {
        let mut store = TaskStore::in_memory();
        store.add(task("a", "A"));
        store.add(task("b", "B"));
        store.add(task("c", "C"));

        assert_eq!(ids(&store), vec!["c", "b", "a"]);
    }

    #[test]
    fn add_stamps_created_at() {
        let mut store = TaskStore::in_memory();
        let mut incoming = task("a", "A");
        incoming.created_at = 42;
        store.add(incoming);

        let stored = store.get("a").expect("task");
        assert_ne!(stored.created_at, 42);
        assert!(stored.created_at > 0);
    }

    #[test]
    fn update_changes_only_named_fields() {
        let mut store = TaskStore::in_memory();
        store.add(task("a", "A"));
        store.add(task("b", "B"));

        store.update(
            "a",
            TaskPatch {
                title: Some("A2".to_string()),
                ..TaskPatch::default()
            },
        );

        let updated = store.get("a").expect("task");
        assert_eq!(updated.title, "A2");
        assert_eq!(updated.description, "");
        assert_eq!(updated.due_date, date("2099-01-01"));
        // Order unaffected.
        assert_eq!(ids(&store), vec!["b", "a"]);
    }

    #[test]
    fn update_on_absent_id_is_content_equal_fresh_snapshot() {
        let mut store = TaskStore::in_memory();
        store.add(task("a", "A"));
        let before = store.snapshot();

        store.update(
            "missing",
            TaskPatch {
                title: Some("nope".to_string()),
                ..TaskPatch::default()
            },
        );

        let after = store.snapshot();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);
    }

    #[test]
    fn mutations_swap_the_snapshot() {
        let mut store = TaskStore::in_memory();
        let empty = store.snapshot();
        store.add(task("a", "A"));
        assert!(!Arc::ptr_eq(&empty, &store.snapshot()));
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let mut store = TaskStore::in_memory();
        store.add(task("a", "A"));
        store.add(task("b", "B"));

        store.remove("a");
        assert_eq!(store.len(), 1);
        assert!(store.get("a").is_none());

        store.remove("nope");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn toggle_is_an_involution_on_pending() {
        let mut store = TaskStore::in_memory();
        store.add(task("a", "A"));

        store.toggle_status("a");
        assert_eq!(store.get("a").expect("task").status, TaskStatus::Completed);

        store.toggle_status("a");
        assert_eq!(store.get("a").expect("task").status, TaskStatus::Pending);
    }

    #[test]
    fn toggle_from_overdue_maps_to_completed() {
        let mut store = TaskStore::in_memory();
        store.add(task("a", "A"));
        store.set_status("a", TaskStatus::Overdue);

        store.toggle_status("a");
        assert_eq!(store.get("a").expect("task").status, TaskStatus::Completed);
    }

    #[test]
    fn set_status_overwrites_unconditionally() {
        let mut store = TaskStore::in_memory();
        store.add(task("a", "A"));

        store.set_status("a", TaskStatus::Overdue);
        assert_eq!(store.get("a").expect("task").status, TaskStatus::Overdue);

        store.set_status("a", TaskStatus::Pending);
        assert_eq!(store.get("a").expect("task").status, TaskStatus::Pending);

        // Unknown id: silent no-op.
        store.set_status("nope", TaskStatus::Completed);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reorder_applies_permutation() {
        let mut store = TaskStore::in_memory();
        store.add(task("a", "A"));
        store.add(task("b", "B"));
        store.add(task("c", "C"));
        assert_eq!(ids(&store), vec!["c", "b", "a"]);

        store.reorder(&[
            "a".to_string(),
            "c".to_string(),
            "b".to_string(),
        ]);
        assert_eq!(ids(&store), vec!["a", "c", "b"]);
        // Content untouched.
        assert_eq!(store.get("b").expect("task").title, "B");
    }

    #[test]
    fn reorder_drops_unknown_and_keeps_unnamed() {
        let mut store = TaskStore::in_memory();
        store.add(task("a", "A"));
        store.add(task("b", "B"));
        store.add(task("c", "C"));

        // "ghost" is unknown, "a" appears twice, "c" is never named.
        store.reorder(&[
            "b".to_string(),
            "ghost".to_string(),
            "a".to_string(),
            "a".to_string(),
        ]);
        assert_eq!(ids(&store), vec!["b", "a", "c"]);
    }

    #[test]
    fn sweep_promotes_past_due_pending_once() {
        let mut store = TaskStore::in_memory();
        let mut old = task("a", "A");
        old.due_date = date("2020-01-01");
        store.add(old);

        let now = date("2026-06-01").and_hms_opt(9, 0, 0).expect("time");
        assert_eq!(store.sweep_overdue(now), 1);
        assert_eq!(store.get("a").expect("task").status, TaskStatus::Overdue);

        // Idempotent: a second pass changes nothing and keeps the snapshot.
        let snap = store.snapshot();
        assert_eq!(store.sweep_overdue(now), 0);
        assert!(Arc::ptr_eq(&snap, &store.snapshot()));
    }

    #[test]
    fn sweep_never_touches_completed() {
        let mut store = TaskStore::in_memory();
        let mut done = task("a", "A");
        done.due_date = date("2020-01-01");
        store.add(done);
        store.set_status("a", TaskStatus::Completed);

        let now = date("2026-06-01").and_hms_opt(9, 0, 0).expect("time");
        assert_eq!(store.sweep_overdue(now), 0);
        assert_eq!(store.get("a").expect("task").status, TaskStatus::Completed);
    }

    #[test]
    fn sweep_skips_future_due_dates() {
        let mut store = TaskStore::in_memory();
        store.add(task("a", "A")); // due 2099-01-01

        let now = date("2026-06-01").and_hms_opt(9, 0, 0).expect("time");
        assert_eq!(store.sweep_overdue(now), 0);
        assert_eq!(store.get("a").expect("task").status, TaskStatus::Pending);
    }

    struct RecordingPersister {
        saves: Rc<RefCell<Vec<usize>>>,
    }

    impl StatePersister for RecordingPersister {
        fn load(&self) -> Result<Option<Vec<Task>>> {
            Ok(None)
        }

        fn save(&self, tasks: &[Task]) -> Result<()> {
            self.saves.borrow_mut().push(tasks.len());
            Ok(())
        }
    }

    #[test]
    fn every_mutation_persists() {
        let saves = Rc::new(RefCell::new(Vec::new()));
        let mut store = TaskStore::open(Box::new(RecordingPersister {
            saves: Rc::clone(&saves),
        }));

        store.add(task("a", "A"));
        store.toggle_status("a");
        store.remove("a");

        assert_eq!(*saves.borrow(), vec![1, 1, 0]);
    }

    struct FailingPersister;

    impl StatePersister for FailingPersister {
        fn load(&self) -> Result<Option<Vec<Task>>> {
            Err(crate::error::Error::OperationFailed("disk gone".to_string()))
        }

        fn save(&self, _tasks: &[Task]) -> Result<()> {
            Err(crate::error::Error::OperationFailed("disk gone".to_string()))
        }
    }

    #[test]
    fn persistence_failure_keeps_memory_state() {
        let mut store = TaskStore::open(Box::new(FailingPersister));
        assert!(store.is_empty());

        store.add(task("a", "A"));
        assert_eq!(store.len(), 1);
    }
}
