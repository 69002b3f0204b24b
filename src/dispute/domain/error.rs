//! Error types for report validation, adjudication, and parsing.

use super::{ReportId, ReportStatus};
use crate::error::{ErrorKind, FieldError};
use crate::identity::UserId;
use thiserror::Error;

/// Errors returned by report construction and adjudication.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisputeDomainError {
    /// A free-text payload field is missing or too long.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Only admins adjudicate reports.
    #[error("user {actor} is not an admin")]
    NotAdmin {
        /// Calling user.
        actor: UserId,
    },

    /// The report is not in a status that allows the action.
    #[error("cannot {action} report {report_id} in status {status}")]
    InvalidTransition {
        /// Report identifier.
        report_id: ReportId,
        /// Attempted action.
        action: &'static str,
        /// Current status.
        status: ReportStatus,
    },
}

impl DisputeDomainError {
    /// Classifies the error for the operation boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Field(_) => ErrorKind::Validation,
            Self::NotAdmin { .. } => ErrorKind::Forbidden,
            Self::InvalidTransition { .. } => ErrorKind::StateConflict,
        }
    }
}

/// Error returned while parsing report statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown report status: {0}")]
pub struct ParseReportStatusError(pub String);

/// Error returned while parsing reporter types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown reporter type: {0}")]
pub struct ParseReporterTypeError(pub String);

/// Error returned while parsing resolution actions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown resolution action: {0}")]
pub struct ParseResolutionActionError(pub String);
