//! Task status, search method and payment status vocabularies.
//!
//! Statuses are compared as enum values only. Legacy Indonesian labels are
//! accepted when parsing persisted rows and produced by
//! [`TaskStatus::legacy_label`] for presentation.

use super::{ParsePaymentStatusError, ParseSearchMethodError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not yet visible to workers.
    Draft,
    /// Visible; accepting applicants or awaiting direct assignment.
    Open,
    /// A worker has been selected and must confirm.
    Pending,
    /// The worker accepted a direct offer but has not started.
    Accepted,
    /// Work is in progress.
    Active,
    /// The worker reported the work as done; awaiting poster approval.
    CompletedWorker,
    /// The poster approved completion and the worker has been paid.
    Completed,
    /// The poster cancelled, or an admin refunded, the task.
    Cancelled,
    /// A report froze the task pending admin adjudication.
    Disputed,
}

impl TaskStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 9] = [
        Self::Draft,
        Self::Open,
        Self::Pending,
        Self::Accepted,
        Self::Active,
        Self::CompletedWorker,
        Self::Completed,
        Self::Cancelled,
        Self::Disputed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Active => "active",
            Self::CompletedWorker => "completed_worker",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Disputed => "disputed",
        }
    }

    /// Returns the legacy Indonesian label shown by older clients, if any.
    #[must_use]
    pub const fn legacy_label(self) -> Option<&'static str> {
        match self {
            Self::Pending => Some("menunggu"),
            Self::Active => Some("proses"),
            Self::Completed => Some("selesai"),
            _ => None,
        }
    }

    /// Returns `true` when no further lifecycle transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "draft" => Ok(Self::Draft),
            "open" => Ok(Self::Open),
            "pending" | "menunggu" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "active" | "proses" => Ok(Self::Active),
            "completed_worker" => Ok(Self::CompletedWorker),
            "completed" | "selesai" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "disputed" => Ok(Self::Disputed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// How a worker is found for a task. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// Open applicant pool; the poster accepts one applicant.
    Publication,
    /// The poster assigns a specific worker directly.
    FindWorker,
}

impl SearchMethod {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Publication => "publication",
            Self::FindWorker => "find_worker",
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SearchMethod {
    type Error = ParseSearchMethodError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "publication" => Ok(Self::Publication),
            "find_worker" => Ok(Self::FindWorker),
            _ => Err(ParseSearchMethodError(value.to_owned())),
        }
    }
}

/// Payment provider invoice state, tracked independently of [`TaskStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No invoice has been paid.
    Unpaid,
    /// An invoice is awaiting payment.
    Pending,
    /// The invoice has been paid.
    Paid,
    /// The invoice expired unpaid.
    Expired,
    /// The payment failed.
    Failed,
    /// The payment was refunded after a dispute.
    Refunded,
}

impl PaymentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Expired => "expired",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = ParsePaymentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unpaid" => Ok(Self::Unpaid),
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "expired" => Ok(Self::Expired),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            _ => Err(ParsePaymentStatusError(value.to_owned())),
        }
    }
}
