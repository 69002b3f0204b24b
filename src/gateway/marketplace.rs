//! Gateway wiring the identity port to the task and dispute services.

use super::{CommandOutcome, GatewayError, GatewayResult, ReportCommand, TaskCommand};
use crate::dispute::{domain::ReportId, ports::ReportRepository, services::DisputeService};
use crate::error::ErrorKind;
use crate::identity::{Actor, IdentityContext, UserId};
use crate::task::{
    domain::{NewTask, Task, TaskId},
    ports::{AccountLedger, NotificationEmitter, TaskRepository},
    services::TaskLifecycleService,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, error};

/// Operation surface for callers outside the crate.
pub struct Gateway<I, P, R, L, N, C>
where
    I: IdentityContext,
    P: ReportRepository,
    R: TaskRepository,
    L: AccountLedger,
    N: NotificationEmitter,
    C: Clock + Send + Sync,
{
    identity: Arc<I>,
    tasks: TaskLifecycleService<R, L, N, C>,
    disputes: DisputeService<P, R, L, N, C>,
}

impl<I, P, R, L, N, C> Gateway<I, P, R, L, N, C>
where
    I: IdentityContext,
    P: ReportRepository,
    R: TaskRepository,
    L: AccountLedger,
    N: NotificationEmitter,
    C: Clock + Send + Sync,
{
    /// Creates a gateway over already-wired services.
    #[must_use]
    pub const fn new(
        identity: Arc<I>,
        tasks: TaskLifecycleService<R, L, N, C>,
        disputes: DisputeService<P, R, L, N, C>,
    ) -> Self {
        Self {
            identity,
            tasks,
            disputes,
        }
    }

    /// Creates a task owned by the calling actor.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for unauthenticated callers or invalid input.
    pub async fn create_task(&self, request: NewTask) -> GatewayResult<CommandOutcome> {
        let actor = self.actor().await?;
        let task = self
            .tasks
            .create_task(&actor, request)
            .await
            .map_err(|err| reject("create_task", err.into()))?;
        Ok(CommandOutcome::for_task(&task))
    }

    /// Runs a lifecycle command against a task.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] with the kind of the underlying failure.
    pub async fn execute(
        &self,
        task_id: TaskId,
        command: TaskCommand,
    ) -> GatewayResult<CommandOutcome> {
        let actor = self.actor().await?;
        let operation = command_name(&command);
        self.dispatch(task_id, &actor, command)
            .await
            .map_err(|err| reject(operation, err))
    }

    /// Runs an admin command against a report.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] with the kind of the underlying failure.
    pub async fn adjudicate(
        &self,
        report_id: ReportId,
        command: ReportCommand,
    ) -> GatewayResult<CommandOutcome> {
        let actor = self.actor().await?;
        let operation = match &command {
            ReportCommand::StartReview => "start_review",
            ReportCommand::Resolve(_) => "resolve_report",
            ReportCommand::Reject { .. } => "reject_report",
        };
        self.dispatch_report(report_id, &actor, command)
            .await
            .map_err(|err| reject(operation, err))
    }

    /// Retrieves a task for an authenticated caller.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for unauthenticated callers or unknown tasks.
    pub async fn find_task(&self, task_id: TaskId) -> GatewayResult<Task> {
        self.actor().await?;
        Ok(self.tasks.find_task(task_id).await?)
    }

    /// Returns the user the caller may review for a completed task.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] for unauthenticated callers or unknown tasks.
    pub async fn review_target(&self, task_id: TaskId) -> GatewayResult<Option<UserId>> {
        let actor = self.actor().await?;
        Ok(self.tasks.review_target(task_id, &actor).await?)
    }

    async fn actor(&self) -> GatewayResult<Actor> {
        Ok(self.identity.current_actor().await?)
    }

    async fn dispatch(
        &self,
        task_id: TaskId,
        actor: &Actor,
        command: TaskCommand,
    ) -> GatewayResult<CommandOutcome> {
        let tasks = &self.tasks;
        let task = match command {
            TaskCommand::Publish => tasks.publish(task_id, actor).await?,
            TaskCommand::Apply => tasks.apply(task_id, actor).await?,
            TaskCommand::AssignWorker { worker } => {
                tasks.assign_worker(task_id, actor, worker).await?
            }
            TaskCommand::ConfirmOffer => tasks.confirm_offer(task_id, actor).await?,
            TaskCommand::Confirm(decision) => tasks.confirm(task_id, actor, &decision).await?,
            TaskCommand::SetAgreement(terms) => tasks.set_agreement(task_id, actor, terms).await?,
            TaskCommand::AcceptAgreement => tasks.accept_agreement(task_id, actor).await?,
            TaskCommand::MarkDone => tasks.mark_done(task_id, actor).await?,
            TaskCommand::ApproveCompletion => tasks.approve_completion(task_id, actor).await?,
            TaskCommand::Cancel { reason } => tasks.cancel(task_id, actor, &reason).await?,
            TaskCommand::AcceptApplicant { applicant } => {
                tasks.accept_applicant(task_id, actor, applicant).await?
            }
            TaskCommand::RejectApplicant { applicant } => {
                tasks.reject_applicant(task_id, actor, applicant).await?
            }
            TaskCommand::RecordPaymentStatus(status) => {
                tasks.record_payment_status(task_id, actor, status).await?
            }
            TaskCommand::FileReport(request) => {
                let filed = self.disputes.file_report(task_id, actor, request).await?;
                return Ok(CommandOutcome::for_report(&filed.task, &filed.report));
            }
        };
        Ok(CommandOutcome::for_task(&task))
    }

    async fn dispatch_report(
        &self,
        report_id: ReportId,
        actor: &Actor,
        command: ReportCommand,
    ) -> GatewayResult<CommandOutcome> {
        let disputes = &self.disputes;
        let outcome = match command {
            ReportCommand::StartReview => {
                let report = disputes.start_review(report_id, actor).await?;
                let task = self.tasks.find_task(report.task_id()).await?;
                return Ok(CommandOutcome::for_report(&task, &report));
            }
            ReportCommand::Resolve(resolution) => {
                disputes.resolve_report(report_id, actor, &resolution).await?
            }
            ReportCommand::Reject { notes } => {
                disputes.reject_report(report_id, actor, &notes).await?
            }
        };
        Ok(CommandOutcome::for_report(&outcome.task, &outcome.report))
    }
}

fn reject(operation: &'static str, err: GatewayError) -> GatewayError {
    if err.kind == ErrorKind::Internal {
        error!(operation, error = %err.message, "operation failed");
    } else {
        debug!(operation, kind = err.kind.code(), error = %err.message, "operation rejected");
    }
    err
}

const fn command_name(command: &TaskCommand) -> &'static str {
    match command {
        TaskCommand::Publish => "publish",
        TaskCommand::Apply => "apply",
        TaskCommand::AssignWorker { .. } => "assign_worker",
        TaskCommand::ConfirmOffer => "confirm_offer",
        TaskCommand::Confirm(_) => "confirm",
        TaskCommand::SetAgreement(_) => "set_agreement",
        TaskCommand::AcceptAgreement => "accept_agreement",
        TaskCommand::MarkDone => "mark_done",
        TaskCommand::ApproveCompletion => "approve_completion",
        TaskCommand::Cancel { .. } => "cancel",
        TaskCommand::AcceptApplicant { .. } => "accept_applicant",
        TaskCommand::RejectApplicant { .. } => "reject_applicant",
        TaskCommand::RecordPaymentStatus(_) => "record_payment_status",
        TaskCommand::FileReport(_) => "file_report",
    }
}
