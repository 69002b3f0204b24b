//! In-memory adapters for tests and single-process embedding.

mod ledger;
mod notifier;
mod task;

pub use ledger::InMemoryAccountLedger;
pub use notifier::RecordingNotificationEmitter;
pub use task::InMemoryTaskRepository;
