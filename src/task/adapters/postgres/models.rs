//! Diesel row models for task persistence.

use super::schema::{notifications, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

/// Task row as stored and queried.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Owning poster.
    pub poster_id: Uuid,
    /// Assigned worker.
    pub assigned_to: Option<Uuid>,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: Option<String>,
    /// Search method.
    pub search_method: String,
    /// Lifecycle status.
    pub status: String,
    /// Applicant pool JSON.
    pub applicants: Value,
    /// Agreement JSON.
    pub agreement: Option<Value>,
    /// Budget in minor units.
    pub budget: i64,
    /// Payment status.
    pub payment_status: String,
    /// Cancellation reason.
    pub cancellation_reason: Option<String>,
    /// Completion approval timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency revision.
    pub revision: i64,
}

/// Mutable task columns written by a conditional update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChanges {
    /// Assigned worker.
    pub assigned_to: Option<Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Applicant pool JSON.
    pub applicants: Value,
    /// Agreement JSON.
    pub agreement: Option<Value>,
    /// Payment status.
    pub payment_status: String,
    /// Cancellation reason.
    pub cancellation_reason: Option<String>,
    /// Completion approval timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency revision.
    pub revision: i64,
}

impl From<TaskRow> for TaskChanges {
    fn from(row: TaskRow) -> Self {
        Self {
            assigned_to: row.assigned_to,
            status: row.status,
            applicants: row.applicants,
            agreement: row.agreement,
            payment_status: row.payment_status,
            cancellation_reason: row.cancellation_reason,
            completed_at: row.completed_at,
            cancelled_at: row.cancelled_at,
            updated_at: row.updated_at,
            revision: row.revision,
        }
    }
}

/// Insert model for notification records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow {
    /// Notification identifier.
    pub id: Uuid,
    /// Recipient user.
    pub user_id: Uuid,
    /// Short title.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Notification category.
    pub kind: String,
    /// Related task or report.
    pub related_id: Uuid,
    /// Read flag.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
