//! Repository port for reports with conditional status updates.

use crate::dispute::domain::{Report, ReportId, ReportStatus};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for report repository operations.
pub type ReportRepositoryResult<T> = Result<T, ReportRepositoryError>;

/// Report persistence contract.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Stores a new report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRepositoryError::DuplicateReport`] when the report ID
    /// already exists.
    async fn store(&self, report: &Report) -> ReportRepositoryResult<()>;

    /// Finds a report by identifier.
    async fn find_by_id(&self, id: ReportId) -> ReportRepositoryResult<Option<Report>>;

    /// Returns every report filed for a task, oldest first.
    async fn find_by_task(&self, task_id: TaskId) -> ReportRepositoryResult<Vec<Report>>;

    /// Returns every report in `status`, oldest first.
    async fn list_by_status(&self, status: ReportStatus) -> ReportRepositoryResult<Vec<Report>>;

    /// Replaces the stored report only if its status and revision still
    /// match the expected values.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRepositoryError::NotFound`] when the report does not
    /// exist and [`ReportRepositoryError::Conflict`] when it has moved on.
    async fn conditional_update(
        &self,
        report: &Report,
        expected_status: ReportStatus,
        expected_revision: u64,
    ) -> ReportRepositoryResult<()>;
}

/// Errors returned by report repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReportRepositoryError {
    /// A report with the same identifier already exists.
    #[error("duplicate report identifier: {0}")]
    DuplicateReport(ReportId),

    /// The report does not exist.
    #[error("report not found: {0}")]
    NotFound(ReportId),

    /// The stored report no longer matches the expected state.
    #[error("report {report_id} changed concurrently: now {status} at revision {revision}")]
    Conflict {
        /// Report identifier.
        report_id: ReportId,
        /// Status found in storage.
        status: ReportStatus,
        /// Revision found in storage.
        revision: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReportRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
