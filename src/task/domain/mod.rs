//! Domain model for the task lifecycle.
//!
//! The task aggregate owns its applicant pool and agreement, enforces the
//! canonical transition table, and describes side effects (settlement and
//! notifications) as values rather than performing them.

mod account;
mod action;
mod agreement;
mod applicant;
mod error;
mod ids;
mod notification;
mod status;
mod task;

pub use account::UserAccount;
pub use action::TaskAction;
pub use agreement::{Agreement, AgreementTerms};
pub use applicant::{Applicant, ApplicantPool, ApplicantStatus};
pub use error::{
    ParsePaymentStatusError, ParseSearchMethodError, ParseTaskStatusError, TaskDomainError,
};
pub use ids::{Amount, TaskId};
pub use notification::{NotificationIntent, NotificationKind};
pub use status::{PaymentStatus, SearchMethod, TaskStatus};
pub use task::{
    ConfirmDecision, DisputeParties, NewTask, PersistedTaskData, SettlementOrder, Task,
};
