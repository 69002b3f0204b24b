//! In-memory account ledger.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::identity::UserId;
use crate::task::{
    domain::{Amount, UserAccount},
    ports::{AccountLedger, LedgerError, LedgerResult},
};

/// Thread-safe in-memory ledger keyed by user.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountLedger {
    accounts: Arc<Mutex<HashMap<UserId, UserAccount>>>,
}

impl InMemoryAccountLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an empty account for `user`, keeping any existing one.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the ledger lock is poisoned.
    pub fn open_account(&self, user: UserId) -> LedgerResult<()> {
        let mut accounts = self.accounts.lock().map_err(lock_error)?;
        accounts
            .entry(user)
            .or_insert_with(|| UserAccount::new(user));
        Ok(())
    }

    /// Returns a snapshot of the user's account.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the ledger lock is poisoned.
    pub fn account(&self, user: UserId) -> LedgerResult<Option<UserAccount>> {
        let accounts = self.accounts.lock().map_err(lock_error)?;
        Ok(accounts.get(&user).copied())
    }
}

fn lock_error(err: impl ToString) -> LedgerError {
    LedgerError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AccountLedger for InMemoryAccountLedger {
    async fn credit_settlement(&self, worker: UserId, amount: Amount) -> LedgerResult<()> {
        let mut accounts = self.accounts.lock().map_err(lock_error)?;
        let account = accounts
            .get_mut(&worker)
            .ok_or(LedgerError::AccountNotFound(worker))?;

        let balance = account
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow(worker))?;
        let total_earnings = account
            .total_earnings
            .checked_add(amount)
            .ok_or(LedgerError::Overflow(worker))?;
        let completed_tasks = account
            .completed_tasks
            .checked_add(1)
            .ok_or(LedgerError::Overflow(worker))?;

        account.balance = balance;
        account.total_earnings = total_earnings;
        account.completed_tasks = completed_tasks;
        Ok(())
    }

    async fn set_verified(&self, user: UserId, verified: bool) -> LedgerResult<()> {
        let mut accounts = self.accounts.lock().map_err(lock_error)?;
        let account = accounts
            .get_mut(&user)
            .ok_or(LedgerError::AccountNotFound(user))?;
        account.is_verified = verified;
        Ok(())
    }
}
