//! Conditional-update helpers shared by the task and dispute services.

use crate::task::{
    domain::{Task, TaskAction},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult, UpdatePrecondition},
};
use mockable::Clock;
use tracing::{debug, error, info};

/// Writes `after` only if the stored task still matches `before`.
///
/// # Errors
///
/// Returns the repository error; conflicts are logged as lost races.
pub(crate) async fn commit_transition<R>(
    repository: &R,
    before: &Task,
    after: &Task,
    action: TaskAction,
) -> TaskRepositoryResult<()>
where
    R: TaskRepository + ?Sized,
{
    match repository
        .conditional_update(after, UpdatePrecondition::of(before))
        .await
    {
        Ok(()) => {
            info!(
                task_id = %after.id(),
                action = action.as_str(),
                from = %before.status(),
                to = %after.status(),
                "task transition committed"
            );
            Ok(())
        }
        Err(err @ TaskRepositoryError::Conflict { .. }) => {
            debug!(
                task_id = %after.id(),
                action = action.as_str(),
                error = %err,
                "lost task update race"
            );
            Err(err)
        }
        Err(err) => Err(err),
    }
}

/// Writes `before` back over a committed `after` whose side effect failed.
///
/// Failure to roll back is logged; the caller still reports the original
/// side-effect error.
pub(crate) async fn roll_back_transition<R, C>(
    repository: &R,
    before: Task,
    committed: &Task,
    clock: &C,
) where
    R: TaskRepository + ?Sized,
    C: Clock,
{
    let mut restored = before;
    restored.supersede(committed, clock);
    match repository
        .conditional_update(&restored, UpdatePrecondition::of(committed))
        .await
    {
        Ok(()) => info!(
            task_id = %committed.id(),
            status = %restored.status(),
            "task transition rolled back"
        ),
        Err(err) => error!(
            task_id = %committed.id(),
            error = %err,
            "failed to roll back task transition"
        ),
    }
}

const SETTLEMENT_REVERT_ATTEMPTS: usize = 3;

/// Clears the settlement recorded by `settled` after its credit failed.
///
/// The stored task is reloaded on every attempt, so a transition committed
/// in between (such as a report freezing the task) is kept and only the
/// settlement markers are undone.
///
/// # Errors
///
/// Returns the last repository error when every attempt fails.
pub(crate) async fn revert_settlement<R, C>(
    repository: &R,
    settled: &Task,
    clock: &C,
) -> TaskRepositoryResult<()>
where
    R: TaskRepository + ?Sized,
    C: Clock,
{
    let mut last_conflict = None;
    for attempt in 1..=SETTLEMENT_REVERT_ATTEMPTS {
        let stored = repository
            .find_by_id(settled.id())
            .await?
            .ok_or(TaskRepositoryError::NotFound(settled.id()))?;
        let mut reverted = stored.clone();
        if !reverted.revert_settlement(settled, clock) {
            return Ok(());
        }
        match repository
            .conditional_update(&reverted, UpdatePrecondition::of(&stored))
            .await
        {
            Ok(()) => {
                info!(
                    task_id = %settled.id(),
                    status = %reverted.status(),
                    attempt,
                    "settlement reverted"
                );
                return Ok(());
            }
            Err(err @ TaskRepositoryError::Conflict { .. }) => {
                debug!(
                    task_id = %settled.id(),
                    attempt,
                    error = %err,
                    "settlement revert raced"
                );
                last_conflict = Some(err);
            }
            Err(err) => return Err(err),
        }
    }
    Err(last_conflict.unwrap_or_else(|| TaskRepositoryError::NotFound(settled.id())))
}
