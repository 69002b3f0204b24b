//! Report status, reporter side, and resolution action enumerations.

use super::{ParseReportStatusError, ParseReporterTypeError, ParseResolutionActionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Adjudication status of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Filed and awaiting an admin.
    Pending,
    /// An admin has picked the report up.
    Reviewing,
    /// Closed with a resolution action.
    Resolved,
    /// Closed without action; the task resumes.
    Rejected,
}

impl ReportStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewing => "reviewing",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` while an admin may still adjudicate the report.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Reviewing)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReportStatus {
    type Error = ParseReportStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "reviewing" => Ok(Self::Reviewing),
            "resolved" => Ok(Self::Resolved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseReportStatusError(value.to_owned())),
        }
    }
}

/// Which side of the task filed the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReporterType {
    /// The task's poster.
    Poster,
    /// The assigned worker.
    Tasker,
}

impl ReporterType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poster => "poster",
            Self::Tasker => "tasker",
        }
    }
}

impl fmt::Display for ReporterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReporterType {
    type Error = ParseReporterTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "poster" => Ok(Self::Poster),
            "tasker" => Ok(Self::Tasker),
            _ => Err(ParseReporterTypeError(value.to_owned())),
        }
    }
}

/// Compensating action applied when a report is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionAction {
    /// Record a warning; the task stays disputed.
    Warning,
    /// Clear the reported user's verification flag.
    SuspendReported,
    /// Cancel the task and mark its payment refunded.
    Refund,
    /// Close without action; the task stays disputed.
    NoAction,
}

impl ResolutionAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::SuspendReported => "suspend_reported",
            Self::Refund => "refund",
            Self::NoAction => "no_action",
        }
    }
}

impl fmt::Display for ResolutionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ResolutionAction {
    type Error = ParseResolutionActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "warning" => Ok(Self::Warning),
            "suspend_reported" => Ok(Self::SuspendReported),
            "refund" => Ok(Self::Refund),
            "no_action" => Ok(Self::NoAction),
            _ => Err(ParseResolutionActionError(value.to_owned())),
        }
    }
}
