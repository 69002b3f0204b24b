//! Error types for task domain validation, transitions and parsing.

use super::{ApplicantStatus, SearchMethod, TaskAction, TaskId, TaskStatus};
use crate::error::{ErrorKind, FieldError};
use crate::identity::UserId;
use thiserror::Error;

/// Errors returned by task construction and lifecycle transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A free-text payload field is missing or too long.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The budget must be positive.
    #[error("task budget must be greater than zero")]
    ZeroBudget,

    /// Too many custom agreement clauses were supplied.
    #[error("agreement has {count} custom clauses, at most {max} allowed")]
    TooManyCustomClauses {
        /// Supplied clause count.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Only the poster may perform the action.
    #[error("user {actor} is not the poster of task {task_id}")]
    NotPoster {
        /// Task identifier.
        task_id: TaskId,
        /// Calling user.
        actor: UserId,
    },

    /// Only the assigned worker may perform the action.
    #[error("user {actor} is not the worker assigned to task {task_id}")]
    NotAssignedWorker {
        /// Task identifier.
        task_id: TaskId,
        /// Calling user.
        actor: UserId,
    },

    /// Only the poster or the assigned worker may perform the action.
    #[error("user {actor} is not a party to task {task_id}")]
    NotParty {
        /// Task identifier.
        task_id: TaskId,
        /// Calling user.
        actor: UserId,
    },

    /// Only an administrator may perform the action.
    #[error("user {actor} is not an administrator")]
    NotAdmin {
        /// Calling user.
        actor: UserId,
    },

    /// The poster tried to work on their own task.
    #[error("poster cannot work on their own task {0}")]
    PosterAsWorker(TaskId),

    /// The action is not legal from the current status and search method.
    #[error("cannot {action} task {task_id} in status {status} ({search_method})")]
    InvalidTransition {
        /// Task identifier.
        task_id: TaskId,
        /// Attempted action.
        action: TaskAction,
        /// Current status.
        status: TaskStatus,
        /// Task search method.
        search_method: SearchMethod,
    },

    /// The applicant is not in the task's applicant pool.
    #[error("user {applicant} has not applied to task {task_id}")]
    ApplicantNotFound {
        /// Task identifier.
        task_id: TaskId,
        /// Applicant user.
        applicant: UserId,
    },

    /// The applicant's entry is no longer pending.
    #[error("applicant {applicant} of task {task_id} is already {status}")]
    ApplicantNotPending {
        /// Task identifier.
        task_id: TaskId,
        /// Applicant user.
        applicant: UserId,
        /// Current applicant status.
        status: ApplicantStatus,
    },

    /// The worker already has an entry in the applicant pool.
    #[error("user {applicant} has already applied to task {task_id}")]
    AlreadyApplied {
        /// Task identifier.
        task_id: TaskId,
        /// Applicant user.
        applicant: UserId,
    },

    /// The task has no agreement to accept.
    #[error("task {0} has no agreement")]
    AgreementMissing(TaskId),
}

impl TaskDomainError {
    /// Classifies the error for the operation boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Field(_) | Self::ZeroBudget | Self::TooManyCustomClauses { .. } => {
                ErrorKind::Validation
            }
            Self::NotPoster { .. }
            | Self::NotAssignedWorker { .. }
            | Self::NotParty { .. }
            | Self::NotAdmin { .. }
            | Self::PosterAsWorker(_) => ErrorKind::Forbidden,
            Self::ApplicantNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidTransition { .. }
            | Self::ApplicantNotPending { .. }
            | Self::AlreadyApplied { .. }
            | Self::AgreementMissing(_) => ErrorKind::StateConflict,
        }
    }
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing search methods from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown search method: {0}")]
pub struct ParseSearchMethodError(pub String);

/// Error returned while parsing payment statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown payment status: {0}")]
pub struct ParsePaymentStatusError(pub String);
