//! `PostgreSQL` repository implementation for reports.

use super::{
    models::{ReportChanges, ReportRow},
    schema::reports,
};
use crate::dispute::{
    domain::{
        PersistedReportData, Report, ReportId, ReportStatus, ReporterType, ResolutionAction,
    },
    ports::{ReportRepository, ReportRepositoryError, ReportRepositoryResult},
};
use crate::identity::UserId;
use crate::task::{
    adapters::postgres::{BlockingError, MarketPgPool, run_blocking},
    domain::TaskId,
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed report repository.
#[derive(Debug, Clone)]
pub struct PostgresReportRepository {
    pool: MarketPgPool,
}

impl PostgresReportRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MarketPgPool) -> Self {
        Self { pool }
    }
}

impl From<BlockingError> for ReportRepositoryError {
    fn from(err: BlockingError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn store(&self, report: &Report) -> ReportRepositoryResult<()> {
        let report_id = report.id();
        let new_row = to_row(report)?;

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(reports::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReportRepositoryError::DuplicateReport(report_id)
                    }
                    _ => ReportRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ReportId) -> ReportRepositoryResult<Option<Report>> {
        run_blocking(&self.pool, move |connection| {
            let row = reports::table
                .filter(reports::id.eq(id.into_inner()))
                .select(ReportRow::as_select())
                .first::<ReportRow>(connection)
                .optional()
                .map_err(ReportRepositoryError::persistence)?;
            row.map(row_to_report).transpose()
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> ReportRepositoryResult<Vec<Report>> {
        run_blocking(&self.pool, move |connection| {
            let rows = reports::table
                .filter(reports::task_id.eq(task_id.into_inner()))
                .order(reports::created_at.asc())
                .select(ReportRow::as_select())
                .load::<ReportRow>(connection)
                .map_err(ReportRepositoryError::persistence)?;
            rows.into_iter().map(row_to_report).collect()
        })
        .await
    }

    async fn list_by_status(&self, status: ReportStatus) -> ReportRepositoryResult<Vec<Report>> {
        run_blocking(&self.pool, move |connection| {
            let rows = reports::table
                .filter(reports::status.eq(status.as_str()))
                .order(reports::created_at.asc())
                .select(ReportRow::as_select())
                .load::<ReportRow>(connection)
                .map_err(ReportRepositoryError::persistence)?;
            rows.into_iter().map(row_to_report).collect()
        })
        .await
    }

    async fn conditional_update(
        &self,
        report: &Report,
        expected_status: ReportStatus,
        expected_revision: u64,
    ) -> ReportRepositoryResult<()> {
        let report_id = report.id();
        let changes = ReportChanges::from(to_row(report)?);
        let expected_revision =
            i64::try_from(expected_revision).map_err(ReportRepositoryError::persistence)?;

        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(
                reports::table
                    .filter(reports::id.eq(report_id.into_inner()))
                    .filter(reports::status.eq(expected_status.as_str()))
                    .filter(reports::revision.eq(expected_revision)),
            )
            .set(&changes)
            .execute(connection)
            .map_err(ReportRepositoryError::persistence)?;

            if updated == 1 {
                return Ok(());
            }

            let current = reports::table
                .filter(reports::id.eq(report_id.into_inner()))
                .select((reports::status, reports::revision))
                .first::<(String, i64)>(connection)
                .optional()
                .map_err(ReportRepositoryError::persistence)?;
            let Some((status, revision)) = current else {
                return Err(ReportRepositoryError::NotFound(report_id));
            };
            Err(ReportRepositoryError::Conflict {
                report_id,
                status: ReportStatus::try_from(status.as_str())
                    .map_err(ReportRepositoryError::persistence)?,
                revision: u64::try_from(revision).map_err(ReportRepositoryError::persistence)?,
            })
        })
        .await
    }
}

fn to_row(report: &Report) -> ReportRepositoryResult<ReportRow> {
    Ok(ReportRow {
        id: report.id().into_inner(),
        task_id: report.task_id().into_inner(),
        reporter_id: report.reporter_id().into_inner(),
        reported_user_id: report.reported_user_id().into_inner(),
        reporter_type: report.reporter_type().as_str().to_owned(),
        reason: report.reason().to_owned(),
        description: report.description().map(str::to_owned),
        status: report.status().as_str().to_owned(),
        resolution: report.resolution().map(str::to_owned),
        action: report.action().map(|action| action.as_str().to_owned()),
        admin_notes: report.admin_notes().map(str::to_owned),
        reviewed_by: report.reviewed_by().map(UserId::into_inner),
        resolved_at: report.resolved_at(),
        created_at: report.created_at(),
        updated_at: report.updated_at(),
        revision: i64::try_from(report.revision()).map_err(ReportRepositoryError::persistence)?,
    })
}

fn row_to_report(row: ReportRow) -> ReportRepositoryResult<Report> {
    let ReportRow {
        id,
        task_id,
        reporter_id,
        reported_user_id,
        reporter_type: persisted_reporter_type,
        reason,
        description,
        status: persisted_status,
        resolution,
        action: persisted_action,
        admin_notes,
        reviewed_by,
        resolved_at,
        created_at,
        updated_at,
        revision,
    } = row;

    let action = persisted_action
        .as_deref()
        .map(ResolutionAction::try_from)
        .transpose()
        .map_err(ReportRepositoryError::persistence)?;

    Ok(Report::from_persisted(PersistedReportData {
        id: ReportId::from_uuid(id),
        task_id: TaskId::from_uuid(task_id),
        reporter_id: UserId::from_uuid(reporter_id),
        reported_user_id: UserId::from_uuid(reported_user_id),
        reporter_type: ReporterType::try_from(persisted_reporter_type.as_str())
            .map_err(ReportRepositoryError::persistence)?,
        reason,
        description,
        status: ReportStatus::try_from(persisted_status.as_str())
            .map_err(ReportRepositoryError::persistence)?,
        resolution,
        action,
        admin_notes,
        reviewed_by: reviewed_by.map(UserId::from_uuid),
        resolved_at,
        created_at,
        updated_at,
        revision: u64::try_from(revision).map_err(ReportRepositoryError::persistence)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::{row_to_report, to_row};
    use crate::config::TextLimits;
    use crate::dispute::domain::{NewReport, Report, ReporterType};
    use crate::identity::UserId;
    use crate::task::domain::{DisputeParties, TaskId};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn filed_report() -> Report {
        let parties = DisputeParties {
            reporter: UserId::new(),
            reported: UserId::new(),
            reporter_is_poster: true,
        };
        Report::file(
            TaskId::new(),
            &parties,
            NewReport::new("Worker never showed up"),
            &TextLimits::default(),
            &DefaultClock,
        )
        .expect("valid report")
    }

    #[rstest]
    fn rows_load_back_into_reports() {
        let report = filed_report();

        let loaded = row_to_report(to_row(&report).expect("report converts")).expect("row loads");

        assert_eq!(loaded, report);
        assert_eq!(loaded.reporter_type(), ReporterType::Poster);
    }

    #[rstest]
    fn unknown_actions_are_rejected() {
        let mut row = to_row(&filed_report()).expect("report converts");
        row.action = Some("ban_forever".to_owned());

        assert!(row_to_report(row).is_err());
    }
}
