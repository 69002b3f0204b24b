//! In-memory integration tests for task persistence.

use super::helpers::{clock, draft_task, poster};
use mockable::DefaultClock;
use rstest::rstest;
use taskmarket::identity::{Actor, UserId};
use taskmarket::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, UpdatePrecondition},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn poster_lookup_returns_tasks_oldest_first(poster: UserId) -> Result<(), eyre::Report> {
    let repository = InMemoryTaskRepository::new();
    let first = draft_task(poster, "Clean the gutters")?;
    let second = draft_task(poster, "Trim the hedge")?;
    let unrelated = draft_task(UserId::new(), "Walk the dog")?;
    for task in [&first, &second, &unrelated] {
        repository.store(task).await?;
    }

    let found = repository.find_by_poster(poster).await?;

    let ids: Vec<TaskId> = found.iter().map(|task| task.id()).collect();
    eyre::ensure!(ids == vec![first.id(), second.id()], "unexpected order {ids:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn storing_a_task_twice_is_rejected(poster: UserId) -> Result<(), eyre::Report> {
    let repository = InMemoryTaskRepository::new();
    let task = draft_task(poster, "Paint the shed")?;
    repository.store(&task).await?;

    let result = repository.store(&task).await;

    eyre::ensure!(
        matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()),
        "expected a duplicate error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_preconditions_are_reported_as_conflicts(
    poster: UserId,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let repository = InMemoryTaskRepository::new();
    let draft = draft_task(poster, "Fix the gate")?;
    repository.store(&draft).await?;
    let expected = UpdatePrecondition::of(&draft);

    let mut published = draft.clone();
    published.publish(&Actor::user(poster), &clock)?;
    repository.conditional_update(&published, expected).await?;

    let mut republished = draft.clone();
    republished.publish(&Actor::user(poster), &clock)?;
    let result = repository.conditional_update(&republished, expected).await;

    match result {
        Err(TaskRepositoryError::Conflict { found, .. }) => {
            eyre::ensure!(found.status == TaskStatus::Open, "found {found}");
            eyre::ensure!(found.revision == published.revision(), "found {found}");
        }
        other => eyre::bail!("expected a conflict, got {other:?}"),
    }
    let stored = repository
        .find_by_id(draft.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task missing"))?;
    eyre::ensure!(stored == published, "first write must win");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_an_unknown_task_is_not_found(poster: UserId) -> Result<(), eyre::Report> {
    let repository = InMemoryTaskRepository::new();
    let task = draft_task(poster, "Move a sofa")?;

    let result = repository
        .conditional_update(&task, UpdatePrecondition::of(&task))
        .await;

    eyre::ensure!(
        matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == task.id()),
        "expected not found, got {result:?}"
    );
    Ok(())
}
