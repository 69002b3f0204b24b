//! In-memory integration tests for the account ledger.

use rstest::rstest;
use taskmarket::identity::UserId;
use taskmarket::task::{
    adapters::memory::InMemoryAccountLedger,
    domain::Amount,
    ports::{AccountLedger, LedgerError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn settlements_accumulate() -> Result<(), eyre::Report> {
    let ledger = InMemoryAccountLedger::new();
    let worker = UserId::new();
    ledger.open_account(worker)?;

    ledger.credit_settlement(worker, Amount::new(150_000)).await?;
    ledger.credit_settlement(worker, Amount::new(25_000)).await?;

    let account = ledger
        .account(worker)?
        .ok_or_else(|| eyre::eyre!("account missing"))?;
    eyre::ensure!(account.balance == Amount::new(175_000), "balance {}", account.balance);
    eyre::ensure!(
        account.total_earnings == Amount::new(175_000),
        "earnings {}",
        account.total_earnings
    );
    eyre::ensure!(account.completed_tasks == 2, "completed {}", account.completed_tasks);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn crediting_an_unknown_account_fails() -> Result<(), eyre::Report> {
    let ledger = InMemoryAccountLedger::new();
    let stranger = UserId::new();

    let result = ledger.credit_settlement(stranger, Amount::new(1)).await;

    eyre::ensure!(
        matches!(result, Err(LedgerError::AccountNotFound(id)) if id == stranger),
        "expected account not found, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overflowing_credits_leave_the_account_untouched() -> Result<(), eyre::Report> {
    let ledger = InMemoryAccountLedger::new();
    let worker = UserId::new();
    ledger.open_account(worker)?;
    ledger.credit_settlement(worker, Amount::new(u64::MAX)).await?;

    let result = ledger.credit_settlement(worker, Amount::new(1)).await;

    eyre::ensure!(
        matches!(result, Err(LedgerError::Overflow(_))),
        "expected overflow, got {result:?}"
    );
    let account = ledger
        .account(worker)?
        .ok_or_else(|| eyre::eyre!("account missing"))?;
    eyre::ensure!(account.completed_tasks == 1, "second credit not counted");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verification_can_be_revoked() -> Result<(), eyre::Report> {
    let ledger = InMemoryAccountLedger::new();
    let worker = UserId::new();
    ledger.open_account(worker)?;

    ledger.set_verified(worker, false).await?;

    let account = ledger
        .account(worker)?
        .ok_or_else(|| eyre::eyre!("account missing"))?;
    eyre::ensure!(!account.is_verified, "verification revoked");
    Ok(())
}
