//! Shared world state for marketplace BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskmarket::dispute::{
    adapters::memory::InMemoryReportRepository, domain::ReportId, services::DisputeService,
};
use taskmarket::gateway::{CommandOutcome, Gateway, GatewayResult, ReportCommand, TaskCommand};
use taskmarket::identity::{Actor, StaticIdentity, UserId};
use taskmarket::task::{
    adapters::memory::{
        InMemoryAccountLedger, InMemoryTaskRepository, RecordingNotificationEmitter,
    },
    domain::TaskId,
    services::TaskLifecycleService,
};

/// Gateway type used by the BDD world.
pub type MarketGateway = Gateway<
    StaticIdentity,
    InMemoryReportRepository,
    InMemoryTaskRepository,
    InMemoryAccountLedger,
    RecordingNotificationEmitter,
    DefaultClock,
>;

/// Scenario world for marketplace behaviour tests.
pub struct MarketWorld {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub reports: Arc<InMemoryReportRepository>,
    pub ledger: Arc<InMemoryAccountLedger>,
    pub emitter: Arc<RecordingNotificationEmitter>,
    pub poster: Actor,
    pub worker: Actor,
    pub admin: Actor,
    pub task_id: Option<TaskId>,
    pub report_id: Option<ReportId>,
    pub last_result: Option<GatewayResult<CommandOutcome>>,
}

impl MarketWorld {
    /// Creates a world with empty stores and fresh actors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(InMemoryTaskRepository::new()),
            reports: Arc::new(InMemoryReportRepository::new()),
            ledger: Arc::new(InMemoryAccountLedger::new()),
            emitter: Arc::new(RecordingNotificationEmitter::new()),
            poster: Actor::user(UserId::new()),
            worker: Actor::user(UserId::new()),
            admin: Actor::admin(UserId::new()),
            task_id: None,
            report_id: None,
            last_result: None,
        }
    }

    /// Builds a gateway that resolves every call to `actor`.
    #[must_use]
    pub fn gateway_for(&self, actor: Actor) -> MarketGateway {
        let clock = Arc::new(DefaultClock);
        Gateway::new(
            Arc::new(StaticIdentity::authenticated(actor)),
            TaskLifecycleService::new(
                Arc::clone(&self.tasks),
                Arc::clone(&self.ledger),
                Arc::clone(&self.emitter),
                Arc::clone(&clock),
            ),
            DisputeService::new(
                Arc::clone(&self.reports),
                Arc::clone(&self.tasks),
                Arc::clone(&self.ledger),
                Arc::clone(&self.emitter),
                clock,
            ),
        )
    }

    /// Returns the scenario's task identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn current_task(&self) -> Result<TaskId, eyre::Report> {
        self.task_id
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the scenario's report identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when no report has been filed yet.
    pub fn current_report(&self) -> Result<ReportId, eyre::Report> {
        self.report_id
            .ok_or_else(|| eyre::eyre!("missing report in scenario world"))
    }

    /// Runs a task command as `actor` and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn execute_as(&mut self, actor: Actor, command: TaskCommand) -> Result<(), eyre::Report> {
        let task_id = self.current_task()?;
        let result = run_async(self.gateway_for(actor).execute(task_id, command));
        if let Ok(outcome) = &result
            && let Some(report) = &outcome.report
        {
            self.report_id = Some(report.report_id);
        }
        self.last_result = Some(result);
        Ok(())
    }

    /// Runs a report command as `actor` and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error when no report has been filed yet.
    pub fn adjudicate_as(
        &mut self,
        actor: Actor,
        command: ReportCommand,
    ) -> Result<(), eyre::Report> {
        let report_id = self.current_report()?;
        let result = run_async(self.gateway_for(actor).adjudicate(report_id, command));
        self.last_result = Some(result);
        Ok(())
    }

    /// Fails when the most recent command did not succeed.
    ///
    /// # Errors
    ///
    /// Returns the recorded gateway error, or an error if nothing ran.
    pub fn expect_success(&self) -> Result<(), eyre::Report> {
        match &self.last_result {
            Some(Ok(_)) => Ok(()),
            Some(Err(err)) => Err(eyre::eyre!("command failed: {err}")),
            None => Err(eyre::eyre!("no command has run")),
        }
    }
}

impl Default for MarketWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MarketWorld {
    MarketWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
