//! Diesel row models for report persistence.

use super::schema::reports;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Report row as stored and queried.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReportRow {
    /// Report identifier.
    pub id: Uuid,
    /// Disputed task.
    pub task_id: Uuid,
    /// Filing user.
    pub reporter_id: Uuid,
    /// Reported user.
    pub reported_user_id: Uuid,
    /// Reporter side.
    pub reporter_type: String,
    /// Short reason.
    pub reason: String,
    /// Longer account.
    pub description: Option<String>,
    /// Adjudication status.
    pub status: String,
    /// Resolution text.
    pub resolution: Option<String>,
    /// Applied resolution action.
    pub action: Option<String>,
    /// Internal admin notes.
    pub admin_notes: Option<String>,
    /// Adjudicating admin.
    pub reviewed_by: Option<Uuid>,
    /// Adjudication timestamp.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Filing timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency revision.
    pub revision: i64,
}

/// Adjudication columns written by a conditional update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reports)]
#[diesel(treat_none_as_null = true)]
pub struct ReportChanges {
    /// Adjudication status.
    pub status: String,
    /// Resolution text.
    pub resolution: Option<String>,
    /// Applied resolution action.
    pub action: Option<String>,
    /// Internal admin notes.
    pub admin_notes: Option<String>,
    /// Adjudicating admin.
    pub reviewed_by: Option<Uuid>,
    /// Adjudication timestamp.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency revision.
    pub revision: i64,
}

impl From<ReportRow> for ReportChanges {
    fn from(row: ReportRow) -> Self {
        Self {
            status: row.status,
            resolution: row.resolution,
            action: row.action,
            admin_notes: row.admin_notes,
            reviewed_by: row.reviewed_by,
            resolved_at: row.resolved_at,
            updated_at: row.updated_at,
            revision: row.revision,
        }
    }
}
