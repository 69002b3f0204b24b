//! Commands accepted by the gateway and the outcome they report.

use crate::dispute::domain::{NewReport, Report, ReportId, ReportStatus, Resolution};
use crate::identity::UserId;
use crate::task::domain::{AgreementTerms, ConfirmDecision, PaymentStatus, Task, TaskId, TaskStatus};

/// A lifecycle operation on an existing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Poster publishes a draft.
    Publish,
    /// Worker applies to a publication task.
    Apply,
    /// Poster assigns a worker to a `find_worker` task.
    AssignWorker {
        /// Worker to assign.
        worker: UserId,
    },
    /// Assigned worker accepts a direct offer.
    ConfirmOffer,
    /// Assigned worker accepts or declines the assignment.
    Confirm(ConfirmDecision),
    /// Poster writes the agreement.
    SetAgreement(AgreementTerms),
    /// Assigned worker accepts the agreement.
    AcceptAgreement,
    /// Assigned worker submits the work.
    MarkDone,
    /// Poster approves completion, settling the worker.
    ApproveCompletion,
    /// Poster cancels the task.
    Cancel {
        /// Cancellation reason.
        reason: String,
    },
    /// Poster accepts one applicant.
    AcceptApplicant {
        /// Applicant to accept.
        applicant: UserId,
    },
    /// Poster rejects one applicant.
    RejectApplicant {
        /// Applicant to reject.
        applicant: UserId,
    },
    /// Payment webhook records the provider status.
    RecordPaymentStatus(PaymentStatus),
    /// Either party files a report.
    FileReport(NewReport),
}

/// An admin operation on a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCommand {
    /// Pick the report up for review.
    StartReview,
    /// Close the report with a compensating action.
    Resolve(Resolution),
    /// Close the report without action.
    Reject {
        /// Admin notes explaining the rejection.
        notes: String,
    },
}

/// Report identity and status after a dispute command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    /// Report identifier.
    pub report_id: ReportId,
    /// Report status after the command.
    pub status: ReportStatus,
}

impl From<&Report> for ReportSummary {
    fn from(report: &Report) -> Self {
        Self {
            report_id: report.id(),
            status: report.status(),
        }
    }
}

/// Result of a successful command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Task the command concerned.
    pub task_id: TaskId,
    /// Task status after the command.
    pub new_status: TaskStatus,
    /// Report touched by the command, if any.
    pub report: Option<ReportSummary>,
}

impl CommandOutcome {
    pub(super) fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id(),
            new_status: task.status(),
            report: None,
        }
    }

    pub(super) fn for_report(task: &Task, report: &Report) -> Self {
        Self {
            report: Some(ReportSummary::from(report)),
            ..Self::for_task(task)
        }
    }
}
