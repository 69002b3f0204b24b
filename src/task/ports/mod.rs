//! Port contracts for the task lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by task and dispute
//! services.

pub mod ledger;
pub mod notifier;
pub mod repository;

pub use ledger::{AccountLedger, LedgerError, LedgerResult};
pub use notifier::{NotificationEmitter, NotificationError};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult, UpdatePrecondition};

#[cfg(test)]
pub use ledger::MockAccountLedger;
#[cfg(test)]
pub use notifier::MockNotificationEmitter;
