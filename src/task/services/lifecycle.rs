//! Service layer for task lifecycle transitions and settlement.

use super::{
    EffectDispatcher,
    commit::{commit_transition, revert_settlement},
};
use crate::config::{MarketplaceConfig, TextLimits};
use crate::error::ErrorKind;
use crate::identity::{Actor, UserId};
use crate::task::{
    domain::{
        AgreementTerms, ConfirmDecision, NewTask, NotificationIntent, PaymentStatus, Task,
        TaskAction, TaskDomainError, TaskId,
    },
    ports::{
        AccountLedger, LedgerError, NotificationEmitter, TaskRepository, TaskRepositoryError,
        UpdatePrecondition,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or transition rule failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Settlement credit failed; the transition was rolled back.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
}

impl TaskLifecycleError {
    /// Classifies the error for the operation boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => repository_error_kind(err),
            Self::Ledger(_) => ErrorKind::Internal,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Classifies a task repository error.
#[must_use]
pub const fn repository_error_kind(err: &TaskRepositoryError) -> ErrorKind {
    match err {
        TaskRepositoryError::Conflict { .. } | TaskRepositoryError::DuplicateTask(_) => {
            ErrorKind::StateConflict
        }
        TaskRepositoryError::NotFound(_) => ErrorKind::NotFound,
        TaskRepositoryError::Persistence(_) => ErrorKind::Internal,
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Each operation loads the task, applies one domain transition to a copy,
/// commits it with a conditional update against the loaded status and
/// revision, and only then dispatches notifications.
pub struct TaskLifecycleService<R, L, N, C>
where
    R: TaskRepository,
    L: AccountLedger,
    N: NotificationEmitter,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    ledger: Arc<L>,
    dispatcher: EffectDispatcher<N>,
    clock: Arc<C>,
    limits: TextLimits,
}

impl<R, L, N, C> Clone for TaskLifecycleService<R, L, N, C>
where
    R: TaskRepository,
    L: AccountLedger,
    N: NotificationEmitter,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            ledger: Arc::clone(&self.ledger),
            dispatcher: self.dispatcher.clone(),
            clock: Arc::clone(&self.clock),
            limits: self.limits,
        }
    }
}

impl<R, L, N, C> TaskLifecycleService<R, L, N, C>
where
    R: TaskRepository,
    L: AccountLedger,
    N: NotificationEmitter,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, ledger: Arc<L>, emitter: Arc<N>, clock: Arc<C>) -> Self {
        Self::with_config(repository, ledger, emitter, clock, MarketplaceConfig::default())
    }

    /// Creates a service with an explicit configuration.
    #[must_use]
    pub const fn with_config(
        repository: Arc<R>,
        ledger: Arc<L>,
        emitter: Arc<N>,
        clock: Arc<C>,
        config: MarketplaceConfig,
    ) -> Self {
        Self {
            repository,
            ledger,
            dispatcher: EffectDispatcher::new(emitter, config.notifications),
            clock,
            limits: config.limits,
        }
    }

    /// Creates and stores a task owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for invalid input or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create_task(&self, actor: &Actor, request: NewTask) -> TaskLifecycleResult<Task> {
        let task = Task::new(actor.id(), request, &self.limits, &*self.clock)?;
        self.repository.store(&task).await?;
        info!(
            task_id = %task.id(),
            poster_id = %task.poster_id(),
            search_method = %task.search_method(),
            status = %task.status(),
            "task created"
        );
        Ok(task)
    }

    /// Retrieves a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist
    /// or [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn find_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Lists the tasks a poster owns.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn tasks_posted_by(&self, poster: UserId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.find_by_poster(poster).await?)
    }

    /// Publishes a draft task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not the poster, the
    /// task is not a draft, or the update loses a race.
    pub async fn publish(&self, task_id: TaskId, actor: &Actor) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::Publish, |task, clock, _| {
            task.publish(actor, clock)?;
            Ok(Vec::new())
        })
        .await
    }

    /// Adds the caller to a publication task's applicant pool.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] for the poster, repeat applications,
    /// tasks that are not open publications, or lost races.
    pub async fn apply(&self, task_id: TaskId, actor: &Actor) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::Apply, |task, clock, _| {
            task.apply(actor, clock)
        })
        .await
    }

    /// Assigns a worker directly to a `find_worker` task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not the poster, the
    /// task is not a `find_worker` task in `draft` or `open`, or the update
    /// loses a race.
    pub async fn assign_worker(
        &self,
        task_id: TaskId,
        actor: &Actor,
        worker: UserId,
    ) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::AssignWorker, |task, clock, _| {
            task.assign_worker(actor, worker, clock)
        })
        .await
    }

    /// Accepts a direct offer as the assigned worker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not the assigned
    /// worker, the task is not a pending `find_worker` task, or the update
    /// loses a race.
    pub async fn confirm_offer(&self, task_id: TaskId, actor: &Actor) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::ConfirmOffer, |task, clock, _| {
            task.confirm_offer(actor, clock)
        })
        .await
    }

    /// Applies the assigned worker's accept or reject decision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not the assigned
    /// worker, the status does not allow confirmation, a rejection has no
    /// reason, or the update loses a race.
    pub async fn confirm(
        &self,
        task_id: TaskId,
        actor: &Actor,
        decision: &ConfirmDecision,
    ) -> TaskLifecycleResult<Task> {
        let action = match decision {
            ConfirmDecision::Accept => TaskAction::ConfirmAccept,
            ConfirmDecision::Reject { .. } => TaskAction::ConfirmReject,
        };
        self.transition(task_id, action, |task, clock, limits| {
            task.confirm(actor, decision, limits, clock)
        })
        .await
    }

    /// Writes the agreement as the poster.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not the poster, the
    /// status does not allow it, clauses are invalid, or the update loses a
    /// race.
    pub async fn set_agreement(
        &self,
        task_id: TaskId,
        actor: &Actor,
        terms: AgreementTerms,
    ) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::SetAgreement, |task, clock, limits| {
            task.set_agreement(actor, terms, limits, clock)
        })
        .await
    }

    /// Accepts the agreement as the assigned worker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not the assigned
    /// worker, no agreement exists, or the update loses a race.
    pub async fn accept_agreement(
        &self,
        task_id: TaskId,
        actor: &Actor,
    ) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::AcceptAgreement, |task, clock, _| {
            task.accept_agreement(actor, clock)
        })
        .await
    }

    /// Marks an active task as done on behalf of the assigned worker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not the assigned
    /// worker, the task is not active, or the update loses a race.
    pub async fn mark_done(&self, task_id: TaskId, actor: &Actor) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::MarkDone, |task, clock, _| {
            task.mark_done(actor, clock)
        })
        .await
    }

    /// Approves completion and credits the worker exactly once.
    ///
    /// The `completed_worker -> completed` conditional update is the gate: a
    /// duplicate approval finds `completed` and fails before any credit. If
    /// the credit fails the settlement is reverted on the stored task, which
    /// returns to `completed_worker` unless another transition has since
    /// moved it on.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for the wrong caller or status,
    /// [`TaskLifecycleError::Repository`] for lost races, and
    /// [`TaskLifecycleError::Ledger`] when the credit fails.
    pub async fn approve_completion(
        &self,
        task_id: TaskId,
        actor: &Actor,
    ) -> TaskLifecycleResult<Task> {
        let before = self.find_task(task_id).await?;
        let mut task = before.clone();
        let order = task.approve_completion(actor, &*self.clock)?;
        commit_transition(&*self.repository, &before, &task, TaskAction::ApproveCompletion)
            .await?;

        if let Err(err) = self.ledger.credit_settlement(order.worker, order.amount).await {
            error!(
                task_id = %task_id,
                worker = %order.worker,
                amount = %order.amount,
                error = %err,
                "settlement credit failed"
            );
            if let Err(revert_err) =
                revert_settlement(&*self.repository, &task, &*self.clock).await
            {
                error!(
                    task_id = %task_id,
                    error = %revert_err,
                    "failed to revert settlement"
                );
            }
            return Err(err.into());
        }

        info!(
            task_id = %task_id,
            worker = %order.worker,
            amount = %order.amount,
            "task settled"
        );
        self.dispatcher.dispatch(order.notifications).await;
        Ok(task)
    }

    /// Cancels a task on behalf of the poster.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not the poster, the
    /// status does not allow cancellation, the reason is missing, or the
    /// update loses a race.
    pub async fn cancel(
        &self,
        task_id: TaskId,
        actor: &Actor,
        reason: &str,
    ) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::Cancel, |task, clock, limits| {
            task.cancel(actor, reason, limits, clock)
        })
        .await
    }

    /// Accepts one applicant and rejects the other pending applicants in a
    /// single conditional write.
    ///
    /// Of two concurrent acceptances on the same task, only the first write
    /// matches the expected `open` status; the second fails with a conflict.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not the poster, the
    /// applicant is unknown or already decided, the task is not an open
    /// publication, or the update loses a race.
    pub async fn accept_applicant(
        &self,
        task_id: TaskId,
        actor: &Actor,
        applicant: UserId,
    ) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::AcceptApplicant, |task, clock, _| {
            task.accept_applicant(actor, applicant, clock)
        })
        .await
    }

    /// Rejects one pending applicant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the caller is not the poster, the
    /// applicant is unknown or already decided, or the update loses a race.
    pub async fn reject_applicant(
        &self,
        task_id: TaskId,
        actor: &Actor,
        applicant: UserId,
    ) -> TaskLifecycleResult<Task> {
        self.transition(task_id, TaskAction::RejectApplicant, |task, clock, _| {
            task.reject_applicant(actor, applicant, clock)
        })
        .await
    }

    /// Records a payment provider status reported through the webhook
    /// boundary.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] for non-admin callers or lost races.
    pub async fn record_payment_status(
        &self,
        task_id: TaskId,
        actor: &Actor,
        payment_status: PaymentStatus,
    ) -> TaskLifecycleResult<Task> {
        let before = self.find_task(task_id).await?;
        let mut task = before.clone();
        task.record_payment_status(actor, payment_status, &*self.clock)?;
        self.repository
            .conditional_update(&task, UpdatePrecondition::of(&before))
            .await?;
        info!(task_id = %task_id, payment_status = %payment_status, "payment status recorded");
        Ok(task)
    }

    /// Returns the user `actor` may review for a completed task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks.
    pub async fn review_target(
        &self,
        task_id: TaskId,
        actor: &Actor,
    ) -> TaskLifecycleResult<Option<UserId>> {
        Ok(self.find_task(task_id).await?.review_target(actor))
    }

    async fn transition<F>(
        &self,
        task_id: TaskId,
        action: TaskAction,
        apply: F,
    ) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, &C, &TextLimits) -> Result<Vec<NotificationIntent>, TaskDomainError>
            + Send,
    {
        let before = self.find_task(task_id).await?;
        let mut task = before.clone();
        let effects = apply(&mut task, &*self.clock, &self.limits)?;
        commit_transition(&*self.repository, &before, &task, action).await?;
        self.dispatcher.dispatch(effects).await;
        Ok(task)
    }
}
