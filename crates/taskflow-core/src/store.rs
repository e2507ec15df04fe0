use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;
use tracing::{debug, info, instrument};

use crate::datetime::Clock;
use crate::draft::{DraftError, TaskDraft};
use crate::task::{Task, TaskId};
use crate::view::{CategoryFilter, Dashboard, ViewOptions};

/// Owner of the task collection and the only place tasks are added,
/// toggled or removed.
///
/// Tasks keep insertion order. Ids come from a counter that only moves
/// forward, so an id is never handed out twice within one store, even after
/// the task holding it has been deleted.
///
/// The store reads "today" from its own clock, so a new task's creation
/// date is never supplied by the caller.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    clock: Clock,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            clock: Clock::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Builds a store from already-constructed tasks, e.g. sample data.
    /// Later ids continue after the highest id seen; a task whose id is
    /// already present is skipped rather than replacing the earlier one.
    pub fn with_tasks<I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = Task>,
    {
        let mut store = Self::new();
        for task in tasks {
            if store.get(task.id()).is_some() {
                debug!(id = %task.id(), "duplicate seeded id skipped");
                continue;
            }
            store.next_id = store.next_id.max(task.id().0 + 1);
            store.tasks.push(task);
        }
        store
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Validates `draft` and appends the resulting task, created today by
    /// the store's clock.
    ///
    /// On error the collection is left untouched.
    #[instrument(skip(self, draft), fields(title = ?draft.title))]
    pub fn add_task(&mut self, draft: &TaskDraft) -> Result<&Task, DraftError> {
        let today = self.today();
        let valid = match draft.validate(today) {
            Ok(valid) => valid,
            Err(err) => {
                info!(reason = %err, "draft declined");
                return Err(err);
            }
        };

        let id = self.allocate_id();
        let task = Task::new(
            id,
            valid.title,
            valid.description,
            valid.category,
            valid.priority,
            valid.due,
            today,
        );
        debug!(
            id = %id,
            category = %task.category(),
            priority = %task.priority(),
            due = %task.due(),
            "task added"
        );
        self.tasks.push(task);

        let idx = self.tasks.len() - 1;
        Ok(&self.tasks[idx])
    }

    /// Flips the completion flag of one task and returns its new state.
    /// Unknown ids are a no-op and yield `None`.
    #[instrument(skip(self))]
    pub fn toggle_complete(&mut self, id: TaskId) -> Option<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id() == id) else {
            debug!("toggle on unknown id ignored");
            return None;
        };
        let completed = task.toggle();
        debug!(completed, "task toggled");
        Some(completed)
    }

    /// Removes one task, keeping the order of the rest. Unknown ids are a
    /// no-op and yield `None`.
    #[instrument(skip(self))]
    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        let Some(idx) = self.tasks.iter().position(|task| task.id() == id) else {
            debug!("delete on unknown id ignored");
            return None;
        };
        let removed = self.tasks.remove(idx);
        debug!(remaining = self.tasks.len(), "task deleted");
        Some(removed)
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Cloneable handle for hosts that reach the store from more than one
/// thread. Mutations take the write lock one at a time; queries run under a
/// single read lock and so always see a settled collection.
#[derive(Debug, Clone, Default)]
pub struct SharedTaskStore {
    inner: Arc<RwLock<TaskStore>>,
}

impl SharedTaskStore {
    pub fn new(store: TaskStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub fn add_task(&self, draft: &TaskDraft) -> Result<Task, DraftError> {
        let mut store = self.inner.write();
        store.add_task(draft).cloned()
    }

    pub fn toggle_complete(&self, id: TaskId) -> Option<bool> {
        self.inner.write().toggle_complete(id)
    }

    pub fn delete_task(&self, id: TaskId) -> Option<Task> {
        self.inner.write().delete_task(id)
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.inner.read().tasks().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn dashboard(&self, filter: CategoryFilter, options: ViewOptions) -> Dashboard {
        let store = self.inner.read();
        Dashboard::build(store.tasks(), filter, store.today(), options)
    }
}
