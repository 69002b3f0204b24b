//! When steps for marketplace BDD scenarios.

use super::world::MarketWorld;
use rstest_bdd_macros::when;
use taskmarket::dispute::domain::{NewReport, Resolution, ResolutionAction};
use taskmarket::gateway::{ReportCommand, TaskCommand};
use taskmarket::identity::{Actor, UserId};
use taskmarket::task::domain::ConfirmDecision;

fn party(world: &MarketWorld, name: &str) -> Result<Actor, eyre::Report> {
    match name {
        "poster" => Ok(world.poster),
        "worker" => Ok(world.worker),
        "admin" => Ok(world.admin),
        other => Err(eyre::eyre!("unknown party in scenario: {other}")),
    }
}

#[when("the poster assigns the worker")]
fn poster_assigns_worker(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    let worker = world.worker.id();
    world.execute_as(world.poster, TaskCommand::AssignWorker { worker })
}

#[when("the worker confirms the offer")]
fn worker_confirms_offer(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    world.execute_as(world.worker, TaskCommand::ConfirmOffer)
}

#[when("the worker accepts the task")]
fn worker_accepts_task(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    world.execute_as(world.worker, TaskCommand::Confirm(ConfirmDecision::Accept))
}

#[when(r#"the worker declines the task because "{reason}""#)]
fn worker_declines_task(world: &mut MarketWorld, reason: String) -> Result<(), eyre::Report> {
    world.execute_as(
        world.worker,
        TaskCommand::Confirm(ConfirmDecision::Reject { reason }),
    )
}

#[when("the worker marks the task done")]
fn worker_marks_done(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    world.execute_as(world.worker, TaskCommand::MarkDone)
}

#[when("the poster approves completion")]
fn poster_approves_completion(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    world.execute_as(world.poster, TaskCommand::ApproveCompletion)
}

#[when("the poster publishes the task")]
fn poster_publishes(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    world.execute_as(world.poster, TaskCommand::Publish)
}

#[when("a stranger publishes the task")]
fn stranger_publishes(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    world.execute_as(Actor::user(UserId::new()), TaskCommand::Publish)
}

#[when("the worker applies")]
fn worker_applies(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    world.execute_as(world.worker, TaskCommand::Apply)
}

#[when("the poster accepts the worker")]
fn poster_accepts_worker(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    let applicant = world.worker.id();
    world.execute_as(world.poster, TaskCommand::AcceptApplicant { applicant })
}

#[when("the poster cancels the task without a reason")]
fn poster_cancels_without_reason(world: &mut MarketWorld) -> Result<(), eyre::Report> {
    world.execute_as(
        world.poster,
        TaskCommand::Cancel {
            reason: "   ".to_owned(),
        },
    )
}

#[when(r#"the {reporter} files a report because "{reason}""#)]
fn party_files_report(
    world: &mut MarketWorld,
    reporter: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let actor = party(world, &reporter)?;
    world.execute_as(actor, TaskCommand::FileReport(NewReport::new(reason)))
}

#[when(r#"the {caller} rejects the report with notes "{notes}""#)]
fn party_rejects_report(
    world: &mut MarketWorld,
    caller: String,
    notes: String,
) -> Result<(), eyre::Report> {
    let actor = party(world, &caller)?;
    world.adjudicate_as(actor, ReportCommand::Reject { notes })
}

#[when(r#"the admin resolves the report with "{action_name}""#)]
fn admin_resolves_report(
    world: &mut MarketWorld,
    action_name: String,
) -> Result<(), eyre::Report> {
    let action = ResolutionAction::try_from(action_name.as_str())
        .map_err(|err| eyre::eyre!("invalid resolution action in scenario: {err}"))?;
    world.adjudicate_as(
        world.admin,
        ReportCommand::Resolve(Resolution::new("Adjudicated after review", action)),
    )
}
