//! Canonical transition table.
//!
//! Every status-changing operation on a task is named by a [`TaskAction`].
//! [`TaskAction::allowed_from`] is the single source of truth for which
//! actions are legal in which status under which search method; the
//! aggregate consults it before mutating anything.

use super::{SearchMethod, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A task lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Poster makes a draft task visible.
    Publish,
    /// Worker joins the applicant pool.
    Apply,
    /// Poster assigns a specific worker.
    AssignWorker,
    /// Assigned worker accepts a direct offer.
    ConfirmOffer,
    /// Assigned worker confirms and starts work.
    ConfirmAccept,
    /// Assigned worker declines the task.
    ConfirmReject,
    /// Poster writes the agreement.
    SetAgreement,
    /// Assigned worker accepts the agreement.
    AcceptAgreement,
    /// Assigned worker reports the work as done.
    MarkDone,
    /// Poster approves completion, triggering settlement.
    ApproveCompletion,
    /// Poster cancels the task.
    Cancel,
    /// Poster accepts one applicant, rejecting the rest.
    AcceptApplicant,
    /// Poster rejects one applicant.
    RejectApplicant,
    /// A party files a report, freezing the task.
    FileReport,
    /// Admin rejected the report; the task resumes.
    RestoreAfterDispute,
    /// Admin resolved the report with a refund.
    RefundAfterDispute,
}

impl TaskAction {
    /// Returns `true` when the action is legal from `status` for a task found
    /// through `search_method`.
    #[must_use]
    pub const fn allowed_from(self, status: TaskStatus, search_method: SearchMethod) -> bool {
        use SearchMethod::{FindWorker, Publication};
        use TaskStatus::{
            Accepted, Active, Completed, CompletedWorker, Disputed, Draft, Open, Pending,
        };

        match self {
            Self::Publish => matches!(status, Draft),
            Self::Apply | Self::AcceptApplicant | Self::RejectApplicant => {
                matches!(search_method, Publication) && matches!(status, Open)
            }
            Self::AssignWorker => {
                matches!(search_method, FindWorker) && matches!(status, Draft | Open)
            }
            Self::ConfirmOffer => matches!(search_method, FindWorker) && matches!(status, Pending),
            Self::ConfirmAccept | Self::ConfirmReject => matches!(status, Pending | Accepted),
            Self::SetAgreement => matches!(status, Draft | Open),
            Self::AcceptAgreement => matches!(status, Pending | Accepted | Active),
            Self::MarkDone => matches!(status, Active),
            Self::ApproveCompletion => matches!(status, CompletedWorker),
            Self::Cancel => matches!(status, Draft | Open | Pending | Accepted | Active),
            Self::FileReport => matches!(status, Active | CompletedWorker | Completed),
            Self::RestoreAfterDispute | Self::RefundAfterDispute => matches!(status, Disputed),
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Apply => "apply",
            Self::AssignWorker => "assign_worker",
            Self::ConfirmOffer => "confirm_offer",
            Self::ConfirmAccept => "confirm_accept",
            Self::ConfirmReject => "confirm_reject",
            Self::SetAgreement => "set_agreement",
            Self::AcceptAgreement => "accept_agreement",
            Self::MarkDone => "mark_done",
            Self::ApproveCompletion => "approve_completion",
            Self::Cancel => "cancel",
            Self::AcceptApplicant => "accept_applicant",
            Self::RejectApplicant => "reject_applicant",
            Self::FileReport => "file_report",
            Self::RestoreAfterDispute => "restore_after_dispute",
            Self::RefundAfterDispute => "refund_after_dispute",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
