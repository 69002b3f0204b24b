//! In-memory integration tests for report persistence.

use super::helpers::clock;
use mockable::DefaultClock;
use rstest::rstest;
use taskmarket::config::TextLimits;
use taskmarket::dispute::{
    adapters::memory::InMemoryReportRepository,
    domain::{NewReport, Report, ReportStatus},
    ports::{ReportRepository, ReportRepositoryError},
};
use taskmarket::identity::{Actor, UserId};
use taskmarket::task::domain::{DisputeParties, TaskId};

fn filed(task_id: TaskId, reason: &str, clock: &DefaultClock) -> Result<Report, eyre::Report> {
    let parties = DisputeParties {
        reporter: UserId::new(),
        reported: UserId::new(),
        reporter_is_poster: false,
    };
    Ok(Report::file(
        task_id,
        &parties,
        NewReport::new(reason),
        &TextLimits::default(),
        clock,
    )?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reports_for_a_task_come_back_in_filing_order(
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let repository = InMemoryReportRepository::new();
    let task_id = TaskId::new();
    let first = filed(task_id, "No show", &clock)?;
    let second = filed(task_id, "Rude on site", &clock)?;
    let elsewhere = filed(TaskId::new(), "Wrong address", &clock)?;
    for report in [&first, &second, &elsewhere] {
        repository.store(report).await?;
    }

    let found = repository.find_by_task(task_id).await?;

    let reasons: Vec<&str> = found.iter().map(Report::reason).collect();
    eyre::ensure!(reasons == ["No show", "Rude on site"], "got {reasons:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_queue_tracks_status_changes(clock: DefaultClock) -> Result<(), eyre::Report> {
    let repository = InMemoryReportRepository::new();
    let pending = filed(TaskId::new(), "Late", &clock)?;
    repository.store(&pending).await?;

    let mut reviewing = pending.clone();
    reviewing.start_review(&Actor::admin(UserId::new()), &clock)?;
    repository
        .conditional_update(&reviewing, pending.status(), pending.revision())
        .await?;

    eyre::ensure!(
        repository.list_by_status(ReportStatus::Pending).await?.is_empty(),
        "pending queue drained"
    );
    let queue = repository.list_by_status(ReportStatus::Reviewing).await?;
    eyre::ensure!(queue == vec![reviewing], "report moved to the review queue");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_report_updates_conflict(clock: DefaultClock) -> Result<(), eyre::Report> {
    let repository = InMemoryReportRepository::new();
    let pending = filed(TaskId::new(), "Late", &clock)?;
    repository.store(&pending).await?;
    let mut reviewing = pending.clone();
    reviewing.start_review(&Actor::admin(UserId::new()), &clock)?;
    repository
        .conditional_update(&reviewing, pending.status(), pending.revision())
        .await?;

    let result = repository
        .conditional_update(&reviewing, pending.status(), pending.revision())
        .await;

    eyre::ensure!(
        matches!(
            result,
            Err(ReportRepositoryError::Conflict {
                status: ReportStatus::Reviewing,
                ..
            })
        ),
        "expected a conflict, got {result:?}"
    );
    Ok(())
}
