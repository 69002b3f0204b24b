//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    BlockingError, MarketPgPool,
    models::{TaskChanges, TaskRow},
    run_blocking,
    schema::tasks,
};
use crate::identity::UserId;
use crate::task::{
    domain::{
        Agreement, Amount, ApplicantPool, PaymentStatus, PersistedTaskData, SearchMethod, Task,
        TaskId, TaskStatus,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult, UpdatePrecondition},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: MarketPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MarketPgPool) -> Self {
        Self { pool }
    }
}

impl From<BlockingError> for TaskRepositoryError {
    fn from(err: BlockingError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_row(task)?;

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_poster(&self, poster: UserId) -> TaskRepositoryResult<Vec<Task>> {
        run_blocking(&self.pool, move |connection| {
            let rows = tasks::table
                .filter(tasks::poster_id.eq(poster.into_inner()))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn conditional_update(
        &self,
        task: &Task,
        expected: UpdatePrecondition,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changes = TaskChanges::from(to_row(task)?);
        let expected_revision =
            i64::try_from(expected.revision).map_err(TaskRepositoryError::persistence)?;

        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::status.eq_any(stored_labels(expected.status)))
                    .filter(tasks::revision.eq(expected_revision)),
            )
            .set(&changes)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if updated == 1 {
                return Ok(());
            }

            let current = tasks::table
                .filter(tasks::id.eq(task_id.into_inner()))
                .select((tasks::status, tasks::revision))
                .first::<(String, i64)>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            let Some((status, revision)) = current else {
                return Err(TaskRepositoryError::NotFound(task_id));
            };
            Err(TaskRepositoryError::Conflict {
                task_id,
                expected,
                found: UpdatePrecondition {
                    status: TaskStatus::try_from(status.as_str())
                        .map_err(TaskRepositoryError::persistence)?,
                    revision: u64::try_from(revision).map_err(TaskRepositoryError::persistence)?,
                },
            })
        })
        .await
    }
}

/// Stored spellings of a status, including the legacy label older rows use.
fn stored_labels(status: TaskStatus) -> Vec<&'static str> {
    std::iter::once(status.as_str())
        .chain(status.legacy_label())
        .collect()
}

fn to_row(task: &Task) -> TaskRepositoryResult<TaskRow> {
    let applicants =
        serde_json::to_value(task.applicants()).map_err(TaskRepositoryError::persistence)?;
    let agreement = task
        .agreement()
        .map(serde_json::to_value)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    Ok(TaskRow {
        id: task.id().into_inner(),
        poster_id: task.poster_id().into_inner(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        search_method: task.search_method().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        applicants,
        agreement,
        budget: i64::try_from(task.budget().value()).map_err(TaskRepositoryError::persistence)?,
        payment_status: task.payment_status().as_str().to_owned(),
        cancellation_reason: task.cancellation_reason().map(str::to_owned),
        completed_at: task.completed_at(),
        cancelled_at: task.cancelled_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        revision: i64::try_from(task.revision()).map_err(TaskRepositoryError::persistence)?,
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        poster_id,
        assigned_to,
        title,
        description,
        search_method: persisted_search_method,
        status: persisted_status,
        applicants: persisted_applicants,
        agreement: persisted_agreement,
        budget,
        payment_status: persisted_payment_status,
        cancellation_reason,
        completed_at,
        cancelled_at,
        created_at,
        updated_at,
        revision,
    } = row;

    let applicants = serde_json::from_value::<ApplicantPool>(persisted_applicants)
        .map_err(TaskRepositoryError::persistence)?;
    let agreement = persisted_agreement
        .map(serde_json::from_value::<Agreement>)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        poster_id: UserId::from_uuid(poster_id),
        assigned_to: assigned_to.map(UserId::from_uuid),
        title,
        description,
        search_method: SearchMethod::try_from(persisted_search_method.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        status: TaskStatus::try_from(persisted_status.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        applicants,
        agreement,
        budget: Amount::new(u64::try_from(budget).map_err(TaskRepositoryError::persistence)?),
        payment_status: PaymentStatus::try_from(persisted_payment_status.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        cancellation_reason,
        completed_at,
        cancelled_at,
        created_at,
        updated_at,
        revision: u64::try_from(revision).map_err(TaskRepositoryError::persistence)?,
    };
    Ok(Task::from_persisted(data))
}

#[cfg(test)]
mod tests {
    use super::{row_to_task, stored_labels, to_row};
    use crate::config::TextLimits;
    use crate::identity::UserId;
    use crate::task::domain::{Amount, NewTask, SearchMethod, Task, TaskStatus};
    use mockable::DefaultClock;
    use rstest::rstest;

    #[rstest]
    #[case(TaskStatus::Pending, vec!["pending", "menunggu"])]
    #[case(TaskStatus::Active, vec!["active", "proses"])]
    #[case(TaskStatus::Open, vec!["open"])]
    fn stored_labels_include_legacy_spelling(
        #[case] status: TaskStatus,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(stored_labels(status), expected);
    }

    #[rstest]
    fn status_constraint_admits_every_stored_label() {
        let migration = include_str!(
            "../../../../migrations/2026-01-01-000000_create_marketplace/up.sql"
        );
        for status in TaskStatus::ALL {
            for label in stored_labels(status) {
                assert!(
                    migration.contains(&format!("'{label}'")),
                    "status constraint rejects {label}"
                );
            }
        }
    }

    #[rstest]
    fn legacy_status_rows_load_as_canonical_status() {
        let task = Task::new(
            UserId::new(),
            NewTask::new("Fix the fence", Amount::new(90_000), SearchMethod::FindWorker),
            &TextLimits::default(),
            &DefaultClock,
        )
        .expect("valid task");
        let mut row = to_row(&task).expect("task converts to row");
        "selesai".clone_into(&mut row.status);

        let loaded = row_to_task(row).expect("legacy row loads");
        assert_eq!(loaded.status(), TaskStatus::Completed);
        assert_eq!(loaded.id(), task.id());
    }

    #[rstest]
    fn negative_budget_rows_are_rejected() {
        let task = Task::new(
            UserId::new(),
            NewTask::new("Paint the wall", Amount::new(10), SearchMethod::Publication),
            &TextLimits::default(),
            &DefaultClock,
        )
        .expect("valid task");
        let mut row = to_row(&task).expect("task converts to row");
        row.budget = -1;

        assert!(row_to_task(row).is_err());
    }
}
