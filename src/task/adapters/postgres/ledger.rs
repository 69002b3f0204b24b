//! `PostgreSQL` account ledger using single-statement atomic increments.

use super::{BlockingError, MarketPgPool, run_blocking, schema::users};
use crate::identity::UserId;
use crate::task::{
    domain::Amount,
    ports::{AccountLedger, LedgerError, LedgerResult},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed ledger over the `users` table.
#[derive(Debug, Clone)]
pub struct PostgresAccountLedger {
    pool: MarketPgPool,
}

impl PostgresAccountLedger {
    /// Creates a new ledger from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MarketPgPool) -> Self {
        Self { pool }
    }
}

impl From<BlockingError> for LedgerError {
    fn from(err: BlockingError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl AccountLedger for PostgresAccountLedger {
    async fn credit_settlement(&self, worker: UserId, amount: Amount) -> LedgerResult<()> {
        let credit = i64::try_from(amount.value()).map_err(|_| LedgerError::Overflow(worker))?;

        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(worker.into_inner())))
                .set((
                    users::balance.eq(users::balance + credit),
                    users::total_earnings.eq(users::total_earnings + credit),
                    users::completed_tasks.eq(users::completed_tasks + 1),
                ))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::Unknown, ref info)
                        if is_numeric_overflow(info.as_ref()) =>
                    {
                        LedgerError::Overflow(worker)
                    }
                    _ => LedgerError::persistence(err),
                })?;
            if updated == 0 {
                return Err(LedgerError::AccountNotFound(worker));
            }
            Ok(())
        })
        .await
    }

    async fn set_verified(&self, user: UserId, verified: bool) -> LedgerResult<()> {
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(user.into_inner())))
                .set(users::is_verified.eq(verified))
                .execute(connection)
                .map_err(LedgerError::persistence)?;
            if updated == 0 {
                return Err(LedgerError::AccountNotFound(user));
            }
            Ok(())
        })
        .await
    }
}

fn is_numeric_overflow(info: &dyn DatabaseErrorInformation) -> bool {
    info.message().contains("out of range")
}
