//! `PostgreSQL` adapters for task lifecycle persistence.

mod ledger;
mod models;
mod notifier;
mod pool;
mod repository;
pub(crate) mod schema;

pub use ledger::PostgresAccountLedger;
pub use notifier::PostgresNotificationEmitter;
pub use pool::{BlockingError, MarketPgPool, run_blocking};
pub use repository::PostgresTaskRepository;
