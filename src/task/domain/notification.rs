//! Notification intents produced by lifecycle transitions.
//!
//! Transitions never deliver notifications themselves. They return intents,
//! and the service hands them to a dispatcher after the transition commits.

use crate::identity::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A worker applied to the poster's task.
    NewApplicant,
    /// The poster selected the worker, directly or from the pool.
    TaskOffered,
    /// The poster declined the worker's application.
    ApplicationRejected,
    /// The worker accepted or started the task.
    TaskConfirmed,
    /// The worker declined the task.
    TaskDeclined,
    /// The agreement was written or accepted.
    AgreementUpdated,
    /// The worker submitted the work for approval.
    WorkSubmitted,
    /// The poster approved completion.
    TaskCompleted,
    /// Settlement credited the worker.
    PaymentReleased,
    /// The poster cancelled the task.
    TaskCancelled,
    /// A report was filed against the recipient.
    DisputeFiled,
    /// An admin adjudicated a report involving the recipient.
    DisputeClosed,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewApplicant => "new_applicant",
            Self::TaskOffered => "task_offered",
            Self::ApplicationRejected => "application_rejected",
            Self::TaskConfirmed => "task_confirmed",
            Self::TaskDeclined => "task_declined",
            Self::AgreementUpdated => "agreement_updated",
            Self::WorkSubmitted => "work_submitted",
            Self::TaskCompleted => "task_completed",
            Self::PaymentReleased => "payment_released",
            Self::TaskCancelled => "task_cancelled",
            Self::DisputeFiled => "dispute_filed",
            Self::DisputeClosed => "dispute_closed",
        }
    }
}

/// Request to create one notification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    /// Recipient user.
    pub recipient: UserId,
    /// Short title.
    pub title: String,
    /// Human-readable message body.
    pub message: String,
    /// Notification category.
    pub kind: NotificationKind,
    /// Identifier of the task or report the notification refers to.
    pub related_id: Uuid,
}

impl NotificationIntent {
    /// Creates a notification intent.
    #[must_use]
    pub fn new(
        recipient: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        related_id: Uuid,
    ) -> Self {
        Self {
            recipient,
            title: title.into(),
            message: message.into(),
            kind,
            related_id,
        }
    }
}
