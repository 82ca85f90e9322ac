//! In-memory task store.
//!
//! Every operation runs inside a single critical section on the store mutex,
//! so sequence allocation and map mutation are atomic with respect to
//! concurrent requests.

use super::entity::Task;
use crate::clock::{Clock, SystemClock};
use crate::error::Error;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::debug;

/// Id handed to the first inserted task.
pub const FIRST_TASK_ID: i64 = 0;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("task {0} not found")]
    NotFound(i64),

    /// The candidate matched the stored record. Carries that record.
    #[error("task {} not modified", .0.id)]
    NotModified(Box<Task>),

    /// Every id up to `i64::MAX` has been handed out.
    #[error("task id sequence exhausted")]
    SequenceExhausted,
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => Error::NotFound,
            RepositoryError::NotModified(_) => Error::NotModified,
            RepositoryError::SequenceExhausted => Error::internal(RepositoryError::SequenceExhausted),
        }
    }
}

pub trait TaskRepository: Send + Sync {
    fn get_by_id(&self, id: i64) -> Result<Task, RepositoryError>;

    /// All tasks by ascending id.
    fn get_all(&self) -> Vec<Task>;

    /// Store `candidate` under the next sequence id, ignoring any id it carries.
    ///
    /// Fails with [`RepositoryError::SequenceExhausted`] once `i64::MAX` has
    /// been used.
    fn insert(&self, candidate: Task) -> Result<Task, RepositoryError>;

    /// Replace the content fields of the task with `candidate.id`.
    ///
    /// Returns the record as it was *before* the update. A candidate whose
    /// content equals the stored record leaves it untouched and fails with
    /// [`RepositoryError::NotModified`].
    fn update(&self, candidate: Task) -> Result<Task, RepositoryError>;

    fn remove_by_id(&self, id: i64) -> Result<Task, RepositoryError>;

    /// Remove every id in input order, or nothing at all.
    ///
    /// The first id that is absent (or repeated) aborts the batch before any
    /// record is removed.
    fn remove_by_ids(&self, ids: &[i64]) -> Result<Vec<Task>, RepositoryError>;
}

#[derive(Debug)]
struct Store {
    tasks: HashMap<i64, Task>,
    /// Next id to hand out. `None` once the sequence is used up.
    next_id: Option<i64>,
}

/// Process-local [`TaskRepository`].
pub struct InMemoryTaskRepository {
    store: Mutex<Store>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store {
                tasks: HashMap::new(),
                next_id: Some(FIRST_TASK_ID),
            }),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed stored records as-is. The sequence skips past the largest seeded id;
    /// seeding `i64::MAX` leaves no id for later inserts.
    pub fn with_tasks(self, tasks: impl IntoIterator<Item = Task>) -> Self {
        {
            let mut store = self.store();
            for task in tasks {
                store.next_id = match (store.next_id, task.id.checked_add(1)) {
                    (Some(next), Some(after)) => Some(next.max(after)),
                    _ => None,
                };
                store.tasks.insert(task.id, task);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.store().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn get_by_id(&self, id: i64) -> Result<Task, RepositoryError> {
        self.store()
            .tasks
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    fn get_all(&self) -> Vec<Task> {
        let store = self.store();
        let mut ids: Vec<i64> = store.tasks.keys().copied().collect();
        ids.sort_unstable();
        ids.iter().map(|id| store.tasks[id].clone()).collect()
    }

    fn insert(&self, mut candidate: Task) -> Result<Task, RepositoryError> {
        let mut store = self.store();
        candidate.id = store.next_id.ok_or(RepositoryError::SequenceExhausted)?;
        store.next_id = candidate.id.checked_add(1);

        let now = self.clock.now();
        candidate.created_at = now;
        candidate.updated_at = now;

        store.tasks.insert(candidate.id, candidate.clone());
        debug!(id = candidate.id, "Task inserted");
        Ok(candidate)
    }

    fn update(&self, mut candidate: Task) -> Result<Task, RepositoryError> {
        let mut store = self.store();
        let previous = store
            .tasks
            .get(&candidate.id)
            .cloned()
            .ok_or(RepositoryError::NotFound(candidate.id))?;

        if previous.same_content(&candidate) {
            return Err(RepositoryError::NotModified(Box::new(previous)));
        }

        candidate.created_at = previous.created_at;
        candidate.updated_at = self.clock.now();
        debug!(id = candidate.id, "Task updated");
        store.tasks.insert(candidate.id, candidate);
        Ok(previous)
    }

    fn remove_by_id(&self, id: i64) -> Result<Task, RepositoryError> {
        let removed = self
            .store()
            .tasks
            .remove(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        debug!(id, "Task removed");
        Ok(removed)
    }

    fn remove_by_ids(&self, ids: &[i64]) -> Result<Vec<Task>, RepositoryError> {
        let mut store = self.store();

        let mut seen = HashSet::with_capacity(ids.len());
        for &id in ids {
            if !seen.insert(id) || !store.tasks.contains_key(&id) {
                return Err(RepositoryError::NotFound(id));
            }
        }

        let removed: Vec<Task> = ids
            .iter()
            .filter_map(|id| store.tasks.remove(id))
            .collect();
        debug!(count = removed.len(), "Tasks removed");
        Ok(removed)
    }
}
