//! Given steps for marketplace BDD scenarios.

use super::world::{MarketWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskmarket::gateway::TaskCommand;
use taskmarket::identity::Actor;
use taskmarket::task::domain::{Amount, ConfirmDecision, NewTask, SearchMethod};

fn run_setup(
    world: &mut MarketWorld,
    actor: Actor,
    command: TaskCommand,
) -> Result<(), eyre::Report> {
    world.execute_as(actor, command)?;
    world.expect_success().wrap_err("scenario setup command")
}

#[given("a poster and a worker with an open account")]
fn poster_and_worker(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    world
        .ledger
        .open_account(world.worker.id())
        .wrap_err("open worker account")
}

#[given("a {method} task with a budget of {budget:u64}")]
fn task_with_budget(
    world: &mut MarketWorld,
    method: String,
    budget: u64,
) -> Result<(), eyre::Report> {
    let search_method = SearchMethod::try_from(method.as_str())
        .map_err(|err| eyre::eyre!("invalid search method in scenario: {err}"))?;
    let request = NewTask::new("Repaint the fence", Amount::new(budget), search_method);
    let created = run_async(world.gateway_for(world.poster).create_task(request))
        .wrap_err("create scenario task")?;
    world.task_id = Some(created.task_id);
    Ok(())
}

#[given("the worker is working on the task")]
fn worker_is_working(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    let (poster, worker) = (world.poster, world.worker);
    run_setup(
        world,
        poster,
        TaskCommand::AssignWorker {
            worker: worker.id(),
        },
    )?;
    run_setup(world, worker, TaskCommand::Confirm(ConfirmDecision::Accept))
}

#[given("the worker has delivered and been paid")]
fn worker_delivered_and_paid(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    let (poster, worker) = (world.poster, world.worker);
    worker_is_working(world)?;
    run_setup(world, worker, TaskCommand::MarkDone)?;
    run_setup(world, poster, TaskCommand::ApproveCompletion)
}

#[given("the worker has been accepted on the published task")]
fn worker_accepted_on_publication(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    let (poster, worker) = (world.poster, world.worker);
    run_setup(world, poster, TaskCommand::Publish)?;
    run_setup(world, worker, TaskCommand::Apply)?;
    run_setup(
        world,
        poster,
        TaskCommand::AcceptApplicant {
            applicant: worker.id(),
        },
    )
}
