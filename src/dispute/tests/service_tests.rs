//! Dispute service orchestration tests.

use std::sync::Arc;

use crate::dispute::{
    adapters::memory::InMemoryReportRepository,
    domain::{NewReport, ReportStatus, Resolution, ResolutionAction},
    services::{DisputeError, DisputeService},
};
use crate::error::ErrorKind;
use crate::identity::{Actor, UserId};
use crate::task::{
    adapters::memory::{
        InMemoryAccountLedger, InMemoryTaskRepository, RecordingNotificationEmitter,
    },
    domain::{
        Amount, ApplicantPool, NotificationKind, PaymentStatus, PersistedTaskData, SearchMethod,
        Task, TaskId, TaskStatus,
    },
    ports::{LedgerError, MockAccountLedger, TaskRepository},
};
use eyre::{Result, bail, ensure};
use mockable::{Clock, DefaultClock};
use rstest::rstest;

struct Scenario<L: crate::task::ports::AccountLedger> {
    service: DisputeService<
        InMemoryReportRepository,
        InMemoryTaskRepository,
        L,
        RecordingNotificationEmitter,
        DefaultClock,
    >,
    tasks: Arc<InMemoryTaskRepository>,
    emitter: Arc<RecordingNotificationEmitter>,
    poster: Actor,
    worker: Actor,
    admin: Actor,
}

impl<L: crate::task::ports::AccountLedger> Scenario<L> {
    fn new(ledger: L) -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let emitter = Arc::new(RecordingNotificationEmitter::new());
        let service = DisputeService::new(
            Arc::new(InMemoryReportRepository::new()),
            Arc::clone(&tasks),
            Arc::new(ledger),
            Arc::clone(&emitter),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            tasks,
            emitter,
            poster: Actor::user(UserId::new()),
            worker: Actor::user(UserId::new()),
            admin: Actor::admin(UserId::new()),
        }
    }

    async fn seed_task(&self, status: TaskStatus) -> Result<Task> {
        self.seed_task_assigned_to(status, Some(self.worker.id())).await
    }

    async fn seed_task_assigned_to(
        &self,
        status: TaskStatus,
        assigned_to: Option<UserId>,
    ) -> Result<Task> {
        let now = DefaultClock.utc();
        let task = Task::from_persisted(PersistedTaskData {
            id: TaskId::new(),
            poster_id: self.poster.id(),
            assigned_to,
            title: "Install shelves".to_owned(),
            description: None,
            search_method: SearchMethod::FindWorker,
            status,
            applicants: ApplicantPool::new(),
            agreement: None,
            budget: Amount::new(80_000),
            payment_status: PaymentStatus::Paid,
            cancellation_reason: None,
            completed_at: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
            revision: 0,
        });
        self.tasks.store(&task).await?;
        Ok(task)
    }

    async fn stored_task(&self, id: TaskId) -> Result<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| eyre::eyre!("task {id} missing"))
    }
}

fn memory_scenario() -> Scenario<InMemoryAccountLedger> {
    Scenario::new(InMemoryAccountLedger::new())
}

#[rstest]
#[case(TaskStatus::Active)]
#[case(TaskStatus::CompletedWorker)]
#[case(TaskStatus::Completed)]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_report_resumes_task_as_active(#[case] frozen_from: TaskStatus) -> Result<()> {
    let scenario = memory_scenario();
    let task = scenario.seed_task(frozen_from).await?;

    let filed = scenario
        .service
        .file_report(task.id(), &scenario.poster, NewReport::new("Sloppy work"))
        .await?;
    ensure!(filed.task.status() == TaskStatus::Disputed, "task frozen");
    ensure!(
        scenario.stored_task(task.id()).await?.status() == TaskStatus::Disputed,
        "freeze persisted"
    );

    let rejected = scenario
        .service
        .reject_report(filed.report.id(), &scenario.admin, "Work meets the brief")
        .await?;

    ensure!(rejected.report.status() == ReportStatus::Rejected, "report rejected");
    ensure!(rejected.task.status() == TaskStatus::Active, "task resumed as active");
    ensure!(
        scenario.stored_task(task.id()).await?.status() == TaskStatus::Active,
        "resume persisted"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reports_cannot_be_filed_on_open_tasks() -> Result<()> {
    let scenario = memory_scenario();
    let task = scenario.seed_task(TaskStatus::Open).await?;

    let result = scenario
        .service
        .file_report(task.id(), &scenario.worker, NewReport::new("Poster vanished"))
        .await;

    let Err(err) = result else {
        bail!("filing on an open task must fail");
    };
    ensure!(err.kind() == ErrorKind::StateConflict, "unexpected error: {err}");
    ensure!(
        scenario.service.reports_for_task(task.id()).await?.is_empty(),
        "no report stored"
    );
    Ok(())
}

#[rstest]
#[case(TaskStatus::Draft)]
#[case(TaskStatus::Open)]
#[tokio::test(flavor = "multi_thread")]
async fn posters_get_a_state_conflict_before_any_worker_is_assigned(
    #[case] status: TaskStatus,
) -> Result<()> {
    let scenario = memory_scenario();
    let task = scenario.seed_task_assigned_to(status, None).await?;

    let result = scenario
        .service
        .file_report(task.id(), &scenario.poster, NewReport::new("Nobody applied"))
        .await;

    let Err(err) = result else {
        bail!("filing on a {status} task must fail");
    };
    ensure!(err.kind() == ErrorKind::StateConflict, "unexpected error: {err}");
    ensure!(
        scenario.stored_task(task.id()).await?.status() == status,
        "task left untouched"
    );
    ensure!(
        scenario.service.reports_for_task(task.id()).await?.is_empty(),
        "no report stored"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn strangers_cannot_file_reports() -> Result<()> {
    let scenario = memory_scenario();
    let task = scenario.seed_task(TaskStatus::Active).await?;

    let result = scenario
        .service
        .file_report(
            task.id(),
            &Actor::user(UserId::new()),
            NewReport::new("I dislike this"),
        )
        .await;

    ensure!(
        matches!(&result, Err(err) if err.kind() == ErrorKind::Forbidden),
        "stranger must be forbidden"
    );
    ensure!(
        scenario.stored_task(task.id()).await? == task,
        "task left unchanged"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refund_cancels_the_task() -> Result<()> {
    let scenario = memory_scenario();
    let task = scenario.seed_task(TaskStatus::Active).await?;
    let filed = scenario
        .service
        .file_report(task.id(), &scenario.worker, NewReport::new("Poster refuses to pay"))
        .await?;

    let resolved = scenario
        .service
        .resolve_report(
            filed.report.id(),
            &scenario.admin,
            &Resolution::new("Task voided", ResolutionAction::Refund),
        )
        .await?;

    let stored = scenario.stored_task(task.id()).await?;
    ensure!(resolved.report.status() == ReportStatus::Resolved, "report resolved");
    ensure!(stored.status() == TaskStatus::Cancelled, "task cancelled");
    ensure!(stored.payment_status() == PaymentStatus::Refunded, "payment refunded");
    Ok(())
}

#[rstest]
#[case(ResolutionAction::Warning)]
#[case(ResolutionAction::NoAction)]
#[tokio::test(flavor = "multi_thread")]
async fn warnings_leave_the_task_disputed(#[case] action: ResolutionAction) -> Result<()> {
    let scenario = memory_scenario();
    let task = scenario.seed_task(TaskStatus::Active).await?;
    let filed = scenario
        .service
        .file_report(task.id(), &scenario.poster, NewReport::new("Late arrival"))
        .await?;

    scenario
        .service
        .resolve_report(
            filed.report.id(),
            &scenario.admin,
            &Resolution::new("Noted", action),
        )
        .await?;

    ensure!(
        scenario.stored_task(task.id()).await?.status() == TaskStatus::Disputed,
        "task stays disputed"
    );
    let closing = scenario
        .emitter
        .sent()
        .into_iter()
        .filter(|notice| notice.kind == NotificationKind::DisputeClosed)
        .count();
    ensure!(closing == 2, "both parties notified, got {closing}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn suspension_clears_verification() -> Result<()> {
    let ledger = InMemoryAccountLedger::new();
    let accounts = ledger.clone();
    let scenario = Scenario::new(ledger);
    accounts.open_account(scenario.worker.id())?;
    let task = scenario.seed_task(TaskStatus::Active).await?;
    let filed = scenario
        .service
        .file_report(task.id(), &scenario.poster, NewReport::new("Damaged property"))
        .await?;

    scenario
        .service
        .resolve_report(
            filed.report.id(),
            &scenario.admin,
            &Resolution::new("Worker suspended", ResolutionAction::SuspendReported),
        )
        .await?;

    let account = accounts
        .account(scenario.worker.id())?
        .ok_or_else(|| eyre::eyre!("worker account missing"))?;
    ensure!(!account.is_verified, "reported worker unverified");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_suspension_rolls_the_report_back() -> Result<()> {
    let mut ledger = MockAccountLedger::new();
    ledger
        .expect_set_verified()
        .times(1)
        .returning(|user, _| Err(LedgerError::AccountNotFound(user)));
    let scenario = Scenario::new(ledger);
    let task = scenario.seed_task(TaskStatus::Active).await?;
    let filed = scenario
        .service
        .file_report(task.id(), &scenario.poster, NewReport::new("Harassment"))
        .await?;

    let result = scenario
        .service
        .resolve_report(
            filed.report.id(),
            &scenario.admin,
            &Resolution::new("Suspend", ResolutionAction::SuspendReported),
        )
        .await;

    ensure!(
        matches!(result, Err(DisputeError::Ledger(_))),
        "ledger failure surfaces"
    );
    let stored = scenario.service.find_report(filed.report.id()).await?;
    ensure!(stored.status() == ReportStatus::Pending, "report back to pending");
    ensure!(stored.reviewed_by().is_none(), "adjudication cleared");
    ensure!(
        stored.revision() > filed.report.revision(),
        "rollback written as a new revision"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_adjudication_conflicts() -> Result<()> {
    let scenario = memory_scenario();
    let task = scenario.seed_task(TaskStatus::Completed).await?;
    let filed = scenario
        .service
        .file_report(task.id(), &scenario.worker, NewReport::new("Unfair review"))
        .await?;
    scenario
        .service
        .start_review(filed.report.id(), &scenario.admin)
        .await?;
    let queue = scenario
        .service
        .reports_with_status(ReportStatus::Reviewing)
        .await?;
    ensure!(queue.len() == 1, "report in the review queue");

    scenario
        .service
        .reject_report(filed.report.id(), &scenario.admin, "No evidence")
        .await?;
    let again = scenario
        .service
        .resolve_report(
            filed.report.id(),
            &scenario.admin,
            &Resolution::new("Changed my mind", ResolutionAction::Refund),
        )
        .await;

    ensure!(
        matches!(&again, Err(err) if err.kind() == ErrorKind::StateConflict),
        "closed reports cannot be adjudicated again"
    );
    Ok(())
}
