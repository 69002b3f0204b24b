//! Then steps for marketplace BDD scenarios.

use super::world::{MarketWorld, run_async};
use rstest_bdd_macros::then;
use taskmarket::dispute::{
    domain::{Report, ReportStatus},
    ports::ReportRepository,
};
use taskmarket::task::{
    domain::{Amount, NotificationKind, PaymentStatus, Task, TaskStatus, UserAccount},
    ports::TaskRepository,
};

fn stored_task(world: &MarketWorld) -> Result<Task, eyre::Report> {
    let task_id = world.current_task()?;
    run_async(world.tasks.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} missing from the repository"))
}

fn stored_report(world: &MarketWorld) -> Result<Report, eyre::Report> {
    let report_id = world.current_report()?;
    run_async(world.reports.find_by_id(report_id))?
        .ok_or_else(|| eyre::eyre!("report {report_id} missing from the repository"))
}

fn worker_account(world: &MarketWorld) -> Result<UserAccount, eyre::Report> {
    world
        .ledger
        .account(world.worker.id())?
        .ok_or_else(|| eyre::eyre!("worker account missing"))
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &MarketWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = stored_task(world)?;
    eyre::ensure!(
        task.status() == expected,
        "expected status {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the task payment is "{payment}""#)]
fn task_payment_is(world: &MarketWorld, payment: String) -> Result<(), eyre::Report> {
    let expected = PaymentStatus::try_from(payment.as_str())
        .map_err(|err| eyre::eyre!("invalid expected payment status in scenario: {err}"))?;
    let task = stored_task(world)?;
    eyre::ensure!(
        task.payment_status() == expected,
        "expected payment {expected}, found {}",
        task.payment_status()
    );
    Ok(())
}

#[then("the task is assigned to the worker")]
fn task_assigned_to_worker(world: &MarketWorld) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(
        task.assigned_to() == Some(world.worker.id()),
        "expected the worker to be assigned"
    );
    Ok(())
}

#[then("the task has no assigned worker")]
fn task_has_no_worker(world: &MarketWorld) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(
        task.assigned_to().is_none(),
        "expected no assigned worker, found {:?}",
        task.assigned_to()
    );
    Ok(())
}

#[then("the worker balance is {balance:u64}")]
fn worker_balance_is(world: &MarketWorld, balance: u64) -> Result<(), eyre::Report> {
    let account = worker_account(world)?;
    eyre::ensure!(
        account.balance == Amount::new(balance),
        "expected balance {balance}, found {}",
        account.balance
    );
    Ok(())
}

#[then("the worker has {count:u32} completed task")]
fn worker_completed_tasks(world: &MarketWorld, count: u32) -> Result<(), eyre::Report> {
    let account = worker_account(world)?;
    eyre::ensure!(
        account.completed_tasks == count,
        "expected {count} completed tasks, found {}",
        account.completed_tasks
    );
    Ok(())
}

#[then("the worker is no longer verified")]
fn worker_unverified(world: &MarketWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        !worker_account(world)?.is_verified,
        "expected the worker to be unverified"
    );
    Ok(())
}

#[then(r#"the operation fails with "{code}""#)]
fn operation_fails_with(world: &MarketWorld, code: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation result"))?;
    match result {
        Err(err) if err.kind.code() == code => Ok(()),
        Err(err) => Err(eyre::eyre!("expected {code}, got {}", err.kind)),
        Ok(outcome) => Err(eyre::eyre!(
            "expected {code}, but the task moved to {}",
            outcome.new_status
        )),
    }
}

#[then(r#"the report status is "{status}""#)]
fn report_status_is(world: &MarketWorld, status: String) -> Result<(), eyre::Report> {
    let expected = ReportStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected report status in scenario: {err}"))?;
    let report = stored_report(world)?;
    eyre::ensure!(
        report.status() == expected,
        "expected report status {expected}, found {}",
        report.status()
    );
    Ok(())
}

#[then("both parties are told the dispute closed")]
fn both_parties_told(world: &MarketWorld) -> Result<(), eyre::Report> {
    for party in [world.poster, world.worker] {
        let told = world
            .emitter
            .sent_to(party.id())
            .iter()
            .any(|notice| notice.kind == NotificationKind::DisputeClosed);
        eyre::ensure!(told, "{} was not told the dispute closed", party.id());
    }
    Ok(())
}
