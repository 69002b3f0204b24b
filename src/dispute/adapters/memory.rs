//! In-memory report repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::dispute::{
    domain::{Report, ReportId, ReportStatus},
    ports::{ReportRepository, ReportRepositoryError, ReportRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory report repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportRepository {
    state: Arc<RwLock<InMemoryReportState>>,
}

#[derive(Debug, Default)]
struct InMemoryReportState {
    reports: HashMap<ReportId, Report>,
    filing_order: Vec<ReportId>,
}

impl InMemoryReportState {
    fn ordered(&self, keep: impl Fn(&Report) -> bool) -> Vec<Report> {
        self.filing_order
            .iter()
            .filter_map(|id| self.reports.get(id))
            .filter(|report| keep(report))
            .cloned()
            .collect()
    }
}

impl InMemoryReportRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ReportRepositoryError {
    ReportRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn store(&self, report: &Report) -> ReportRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.reports.contains_key(&report.id()) {
            return Err(ReportRepositoryError::DuplicateReport(report.id()));
        }
        state.filing_order.push(report.id());
        state.reports.insert(report.id(), report.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ReportId) -> ReportRepositoryResult<Option<Report>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.reports.get(&id).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> ReportRepositoryResult<Vec<Report>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.ordered(|report| report.task_id() == task_id))
    }

    async fn list_by_status(&self, status: ReportStatus) -> ReportRepositoryResult<Vec<Report>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.ordered(|report| report.status() == status))
    }

    async fn conditional_update(
        &self,
        report: &Report,
        expected_status: ReportStatus,
        expected_revision: u64,
    ) -> ReportRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .reports
            .get_mut(&report.id())
            .ok_or(ReportRepositoryError::NotFound(report.id()))?;

        if stored.status() != expected_status || stored.revision() != expected_revision {
            return Err(ReportRepositoryError::Conflict {
                report_id: report.id(),
                status: stored.status(),
                revision: stored.revision(),
            });
        }
        *stored = report.clone();
        Ok(())
    }
}
