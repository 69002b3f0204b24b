//! Repository port for task persistence with conditional updates.

use crate::identity::UserId;
use crate::task::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// State a stored task must still be in for a conditional update to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpdatePrecondition {
    /// Expected lifecycle status.
    pub status: TaskStatus,
    /// Expected revision.
    pub revision: u64,
}

impl UpdatePrecondition {
    /// Captures the status and revision of a loaded task.
    #[must_use]
    pub const fn of(task: &Task) -> Self {
        Self {
            status: task.status(),
            revision: task.revision(),
        }
    }
}

impl fmt::Display for UpdatePrecondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at revision {}", self.status, self.revision)
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks owned by a poster, oldest first.
    async fn find_by_poster(&self, poster: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Replaces the stored task only if it still matches `expected`.
    ///
    /// The comparison and the write happen atomically; the whole task,
    /// applicant pool and agreement included, is written as one document.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::Conflict`] when its stored status or
    /// revision differs from `expected`.
    async fn conditional_update(
        &self,
        task: &Task,
        expected: UpdatePrecondition,
    ) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored task changed since it was read.
    #[error("task {task_id} changed concurrently: expected {expected}, found {found}")]
    Conflict {
        /// Task identifier.
        task_id: TaskId,
        /// State the writer expected.
        expected: UpdatePrecondition,
        /// State actually stored.
        found: UpdatePrecondition,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
