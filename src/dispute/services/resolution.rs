//! Service layer for filing and adjudicating reports.

use crate::config::{MarketplaceConfig, TextLimits};
use crate::dispute::{
    domain::{
        DisputeDomainError, NewReport, Report, ReportId, ReportStatus, Resolution,
        ResolutionAction,
    },
    ports::{ReportRepository, ReportRepositoryError, ReportRepositoryResult},
};
use crate::error::ErrorKind;
use crate::identity::Actor;
use crate::task::{
    domain::{Task, TaskAction, TaskDomainError, TaskId},
    ports::{AccountLedger, LedgerError, NotificationEmitter, TaskRepository, TaskRepositoryError},
    services::{EffectDispatcher, commit_transition, repository_error_kind, roll_back_transition},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Service-level errors for dispute operations.
#[derive(Debug, Error)]
pub enum DisputeError {
    /// Report validation or adjudication rule failed.
    #[error(transparent)]
    Report(#[from] DisputeDomainError),
    /// The task-side transition was not allowed.
    #[error(transparent)]
    Task(#[from] TaskDomainError),
    /// Report persistence failed.
    #[error(transparent)]
    Reports(#[from] ReportRepositoryError),
    /// Task persistence failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// Updating the reported user's account failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// No report exists with the given identifier.
    #[error("report {0} not found")]
    ReportNotFound(ReportId),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
}

impl DisputeError {
    /// Classifies the error for the operation boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Report(err) => err.kind(),
            Self::Task(err) => err.kind(),
            Self::Reports(
                ReportRepositoryError::Conflict { .. } | ReportRepositoryError::DuplicateReport(_),
            ) => ErrorKind::StateConflict,
            Self::Reports(ReportRepositoryError::NotFound(_))
            | Self::ReportNotFound(_)
            | Self::TaskNotFound(_) => ErrorKind::NotFound,
            Self::Reports(ReportRepositoryError::Persistence(_)) | Self::Ledger(_) => {
                ErrorKind::Internal
            }
            Self::Tasks(err) => repository_error_kind(err),
        }
    }
}

/// Result type for dispute service operations.
pub type DisputeResult<T> = Result<T, DisputeError>;

/// A report together with the task it concerns, after a dispute operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisputeOutcome {
    /// The report as committed.
    pub report: Report,
    /// The task as committed.
    pub task: Task,
}

/// Dispute resolution orchestration service.
///
/// Report status changes are committed first; the task or account side
/// effect follows, and when it fails the report is written back to its
/// previous state.
pub struct DisputeService<P, R, L, N, C>
where
    P: ReportRepository,
    R: TaskRepository,
    L: AccountLedger,
    N: NotificationEmitter,
    C: Clock + Send + Sync,
{
    reports: Arc<P>,
    tasks: Arc<R>,
    ledger: Arc<L>,
    dispatcher: EffectDispatcher<N>,
    clock: Arc<C>,
    limits: TextLimits,
}

impl<P, R, L, N, C> DisputeService<P, R, L, N, C>
where
    P: ReportRepository,
    R: TaskRepository,
    L: AccountLedger,
    N: NotificationEmitter,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(
        reports: Arc<P>,
        tasks: Arc<R>,
        ledger: Arc<L>,
        emitter: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self::with_config(reports, tasks, ledger, emitter, clock, MarketplaceConfig::default())
    }

    /// Creates a service with an explicit configuration.
    #[must_use]
    pub const fn with_config(
        reports: Arc<P>,
        tasks: Arc<R>,
        ledger: Arc<L>,
        emitter: Arc<N>,
        clock: Arc<C>,
        config: MarketplaceConfig,
    ) -> Self {
        Self {
            reports,
            tasks,
            ledger,
            dispatcher: EffectDispatcher::new(emitter, config.notifications),
            clock,
            limits: config.limits,
        }
    }

    /// Files a report and freezes the task in `disputed`.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeError`] when the caller is not a party, the task is
    /// not `active`, `completed_worker` or `completed`, the reason is
    /// missing, or a write fails. If the report cannot be stored the task
    /// freeze is rolled back.
    pub async fn file_report(
        &self,
        task_id: TaskId,
        actor: &Actor,
        request: NewReport,
    ) -> DisputeResult<DisputeOutcome> {
        let before = self.load_task(task_id).await?;
        let mut task = before.clone();
        let parties = task.open_dispute(actor, &*self.clock)?;
        let report = Report::file(task_id, &parties, request, &self.limits, &*self.clock)?;

        commit_transition(&*self.tasks, &before, &task, TaskAction::FileReport).await?;
        if let Err(err) = self.reports.store(&report).await {
            error!(task_id = %task_id, error = %err, "failed to store report");
            roll_back_transition(&*self.tasks, before, &task, &*self.clock).await;
            return Err(err.into());
        }

        info!(
            report_id = %report.id(),
            task_id = %task_id,
            reporter_type = %report.reporter_type(),
            "report filed"
        );
        self.dispatcher.dispatch(report.filing_notifications()).await;
        Ok(DisputeOutcome { report, task })
    }

    /// Moves a pending report to `reviewing`.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeError`] for non-admin callers, reports that are not
    /// pending, or lost races.
    pub async fn start_review(&self, report_id: ReportId, actor: &Actor) -> DisputeResult<Report> {
        let before = self.load_report(report_id).await?;
        let mut report = before.clone();
        report.start_review(actor, &*self.clock)?;
        self.commit_report(&before, &report).await?;
        Ok(report)
    }

    /// Resolves a report and applies its compensating action.
    ///
    /// `refund` cancels the task and marks it refunded; `suspend_reported`
    /// clears the reported user's verification flag; `warning` and
    /// `no_action` leave the task disputed.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeError`] for non-admin callers, closed reports,
    /// missing resolution text, lost races, or a failed side effect (in
    /// which case the report is rolled back).
    pub async fn resolve_report(
        &self,
        report_id: ReportId,
        actor: &Actor,
        resolution: &Resolution,
    ) -> DisputeResult<DisputeOutcome> {
        let before = self.load_report(report_id).await?;
        let mut report = before.clone();
        let notifications = report.resolve(actor, resolution, &self.limits, &*self.clock)?;

        let task_before = self.load_task(report.task_id()).await?;
        let mut task = task_before.clone();
        if resolution.action == ResolutionAction::Refund {
            task.refund_after_dispute(actor, &*self.clock)?;
        }

        self.commit_report(&before, &report).await?;
        if let Err(err) = self
            .apply_resolution(resolution.action, &report, &task_before, &task)
            .await
        {
            error!(
                report_id = %report_id,
                action = %resolution.action,
                error = %err,
                "resolution action failed"
            );
            self.roll_back_report(before, &report).await;
            return Err(err);
        }

        info!(
            report_id = %report_id,
            task_id = %task.id(),
            action = %resolution.action,
            "report resolved"
        );
        self.dispatcher.dispatch(notifications).await;
        Ok(DisputeOutcome { report, task })
    }

    /// Rejects a report and resumes the task in `active`.
    ///
    /// The task always resumes in `active`, whatever status it was frozen
    /// from.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeError`] for non-admin callers, closed reports,
    /// missing notes, or lost races. If the task cannot be resumed the
    /// report is rolled back.
    pub async fn reject_report(
        &self,
        report_id: ReportId,
        actor: &Actor,
        notes: &str,
    ) -> DisputeResult<DisputeOutcome> {
        let before = self.load_report(report_id).await?;
        let mut report = before.clone();
        let notifications = report.reject(actor, notes, &self.limits, &*self.clock)?;

        let task_before = self.load_task(report.task_id()).await?;
        let mut task = task_before.clone();
        task.restore_after_dispute(actor, &*self.clock)?;

        self.commit_report(&before, &report).await?;
        if let Err(err) = commit_transition(
            &*self.tasks,
            &task_before,
            &task,
            TaskAction::RestoreAfterDispute,
        )
        .await
        {
            error!(report_id = %report_id, error = %err, "failed to resume disputed task");
            self.roll_back_report(before, &report).await;
            return Err(err.into());
        }

        info!(report_id = %report_id, task_id = %task.id(), "report rejected");
        self.dispatcher.dispatch(notifications).await;
        Ok(DisputeOutcome { report, task })
    }

    /// Retrieves a report.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeError::ReportNotFound`] for unknown reports.
    pub async fn find_report(&self, report_id: ReportId) -> DisputeResult<Report> {
        self.load_report(report_id).await
    }

    /// Lists the reports filed for a task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeError::Reports`] when lookup fails.
    pub async fn reports_for_task(&self, task_id: TaskId) -> DisputeResult<Vec<Report>> {
        Ok(self.reports.find_by_task(task_id).await?)
    }

    /// Lists reports in `status` for the admin queue, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeError::Reports`] when lookup fails.
    pub async fn reports_with_status(&self, status: ReportStatus) -> DisputeResult<Vec<Report>> {
        Ok(self.reports.list_by_status(status).await?)
    }

    async fn apply_resolution(
        &self,
        action: ResolutionAction,
        report: &Report,
        task_before: &Task,
        task: &Task,
    ) -> DisputeResult<()> {
        match action {
            ResolutionAction::Refund => Ok(commit_transition(
                &*self.tasks,
                task_before,
                task,
                TaskAction::RefundAfterDispute,
            )
            .await?),
            ResolutionAction::SuspendReported => Ok(self
                .ledger
                .set_verified(report.reported_user_id(), false)
                .await?),
            ResolutionAction::Warning | ResolutionAction::NoAction => Ok(()),
        }
    }

    async fn load_task(&self, task_id: TaskId) -> DisputeResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(DisputeError::TaskNotFound(task_id))
    }

    async fn load_report(&self, report_id: ReportId) -> DisputeResult<Report> {
        self.reports
            .find_by_id(report_id)
            .await?
            .ok_or(DisputeError::ReportNotFound(report_id))
    }

    async fn commit_report(&self, before: &Report, after: &Report) -> ReportRepositoryResult<()> {
        match self
            .reports
            .conditional_update(after, before.status(), before.revision())
            .await
        {
            Ok(()) => {
                info!(
                    report_id = %after.id(),
                    from = %before.status(),
                    to = %after.status(),
                    "report transition committed"
                );
                Ok(())
            }
            Err(err @ ReportRepositoryError::Conflict { .. }) => {
                debug!(report_id = %after.id(), error = %err, "lost report update race");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn roll_back_report(&self, before: Report, committed: &Report) {
        let mut restored = before;
        restored.supersede(committed, &*self.clock);
        match self
            .reports
            .conditional_update(&restored, committed.status(), committed.revision())
            .await
        {
            Ok(()) => info!(
                report_id = %committed.id(),
                status = %restored.status(),
                "report transition rolled back"
            ),
            Err(err) => error!(
                report_id = %committed.id(),
                error = %err,
                "failed to roll back report transition"
            ),
        }
    }
}
