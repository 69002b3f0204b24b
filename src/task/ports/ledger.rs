//! Account ledger port.
//!
//! The ledger is the only writer of balances. Credits are atomic increments
//! applied by the storage layer, never read-modify-write cycles in the
//! caller.

use crate::identity::UserId;
use crate::task::domain::Amount;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Balance and verification capability injected into services.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountLedger: Send + Sync {
    /// Atomically adds `amount` to the worker's balance and lifetime
    /// earnings and increments their completed-task count.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] for unknown users,
    /// [`LedgerError::Overflow`] when a counter would overflow, or a
    /// persistence error. On error nothing is applied.
    async fn credit_settlement(&self, worker: UserId, amount: Amount) -> LedgerResult<()>;

    /// Sets the user's verification flag.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] for unknown users or a
    /// persistence error.
    async fn set_verified(&self, user: UserId, verified: bool) -> LedgerResult<()>;
}

/// Errors returned by ledger implementations.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The user has no account.
    #[error("account not found: {0}")]
    AccountNotFound(UserId),

    /// The credit would overflow a counter.
    #[error("balance overflow for account {0}")]
    Overflow(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LedgerError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
