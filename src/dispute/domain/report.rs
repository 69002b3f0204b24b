//! Report aggregate root and its adjudication transitions.

use super::{DisputeDomainError, ReportId, ReportStatus, ReporterType, ResolutionAction};
use crate::config::TextLimits;
use crate::error::{optional_text, required_text};
use crate::identity::{Actor, UserId};
use crate::task::domain::{DisputeParties, NotificationIntent, NotificationKind, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameters for filing a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    /// Short reason for the report.
    pub reason: String,
    /// Optional longer account of what happened.
    pub description: Option<String>,
}

impl NewReport {
    /// Creates report parameters with a reason and no description.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An admin's resolution of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Resolution text shown to both parties.
    pub resolution: String,
    /// Compensating action to apply.
    pub action: ResolutionAction,
    /// Internal admin notes.
    pub admin_notes: Option<String>,
}

impl Resolution {
    /// Creates a resolution without notes.
    #[must_use]
    pub fn new(resolution: impl Into<String>, action: ResolutionAction) -> Self {
        Self {
            resolution: resolution.into(),
            action,
            admin_notes: None,
        }
    }

    /// Sets the admin notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.admin_notes = Some(notes.into());
        self
    }
}

/// A report filed against the other party of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    id: ReportId,
    task_id: TaskId,
    reporter_id: UserId,
    reported_user_id: UserId,
    reporter_type: ReporterType,
    reason: String,
    description: Option<String>,
    status: ReportStatus,
    resolution: Option<String>,
    action: Option<ResolutionAction>,
    admin_notes: Option<String>,
    reviewed_by: Option<UserId>,
    resolved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: u64,
}

/// Parameter object for reconstructing a persisted report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReportData {
    /// Report identifier.
    pub id: ReportId,
    /// Disputed task.
    pub task_id: TaskId,
    /// Filing user.
    pub reporter_id: UserId,
    /// The other party.
    pub reported_user_id: UserId,
    /// Side the reporter is on.
    pub reporter_type: ReporterType,
    /// Short reason.
    pub reason: String,
    /// Longer account.
    pub description: Option<String>,
    /// Adjudication status.
    pub status: ReportStatus,
    /// Resolution text.
    pub resolution: Option<String>,
    /// Applied resolution action.
    pub action: Option<ResolutionAction>,
    /// Internal admin notes.
    pub admin_notes: Option<String>,
    /// Adjudicating admin.
    pub reviewed_by: Option<UserId>,
    /// Adjudication timestamp.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Filing timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency revision.
    pub revision: u64,
}

impl Report {
    /// Files a report for a task whose dispute parties are already known.
    ///
    /// # Errors
    ///
    /// Returns a field error for a blank reason or over-long text.
    pub fn file(
        task_id: TaskId,
        parties: &DisputeParties,
        request: NewReport,
        limits: &TextLimits,
        clock: &impl Clock,
    ) -> Result<Self, DisputeDomainError> {
        let reason = required_text("reason", &request.reason, limits.max_reason_length)?;
        let description = optional_text(
            "description",
            request.description.as_deref(),
            limits.max_description_length,
        )?;
        let reporter_type = if parties.reporter_is_poster {
            ReporterType::Poster
        } else {
            ReporterType::Tasker
        };

        let timestamp = clock.utc();
        Ok(Self {
            id: ReportId::new(),
            task_id,
            reporter_id: parties.reporter,
            reported_user_id: parties.reported,
            reporter_type,
            reason,
            description,
            status: ReportStatus::Pending,
            resolution: None,
            action: None,
            admin_notes: None,
            reviewed_by: None,
            resolved_at: None,
            created_at: timestamp,
            updated_at: timestamp,
            revision: 0,
        })
    }

    /// Reconstructs a report from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReportData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            reporter_id: data.reporter_id,
            reported_user_id: data.reported_user_id,
            reporter_type: data.reporter_type,
            reason: data.reason,
            description: data.description,
            status: data.status,
            resolution: data.resolution,
            action: data.action,
            admin_notes: data.admin_notes,
            reviewed_by: data.reviewed_by,
            resolved_at: data.resolved_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
            revision: data.revision,
        }
    }

    /// Returns the report identifier.
    #[must_use]
    pub const fn id(&self) -> ReportId {
        self.id
    }

    /// Returns the disputed task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the filing user.
    #[must_use]
    pub const fn reporter_id(&self) -> UserId {
        self.reporter_id
    }

    /// Returns the reported user.
    #[must_use]
    pub const fn reported_user_id(&self) -> UserId {
        self.reported_user_id
    }

    /// Returns the side the reporter is on.
    #[must_use]
    pub const fn reporter_type(&self) -> ReporterType {
        self.reporter_type
    }

    /// Returns the reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the adjudication status.
    #[must_use]
    pub const fn status(&self) -> ReportStatus {
        self.status
    }

    /// Returns the resolution text.
    #[must_use]
    pub fn resolution(&self) -> Option<&str> {
        self.resolution.as_deref()
    }

    /// Returns the applied resolution action.
    #[must_use]
    pub const fn action(&self) -> Option<ResolutionAction> {
        self.action
    }

    /// Returns the admin notes.
    #[must_use]
    pub fn admin_notes(&self) -> Option<&str> {
        self.admin_notes.as_deref()
    }

    /// Returns the adjudicating admin.
    #[must_use]
    pub const fn reviewed_by(&self) -> Option<UserId> {
        self.reviewed_by
    }

    /// Returns the adjudication timestamp.
    #[must_use]
    pub const fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Returns the filing timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic concurrency revision.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Notification telling the reported user about the report.
    #[must_use]
    pub fn filing_notifications(&self) -> Vec<NotificationIntent> {
        vec![self.notify(
            self.reported_user_id,
            NotificationKind::DisputeFiled,
            "Report filed",
            format!("A report was filed about your task: {}", self.reason),
        )]
    }

    /// Marks the report as under review.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeDomainError::NotAdmin`] or
    /// [`DisputeDomainError::InvalidTransition`] unless the report is
    /// pending.
    pub fn start_review(
        &mut self,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<(), DisputeDomainError> {
        ensure_admin(actor)?;
        if self.status != ReportStatus::Pending {
            return Err(self.invalid_transition("review"));
        }
        self.status = ReportStatus::Reviewing;
        self.touch(clock);
        Ok(())
    }

    /// Closes the report with a resolution action.
    ///
    /// The compensating action itself is applied by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeDomainError::NotAdmin`],
    /// [`DisputeDomainError::InvalidTransition`] once the report is closed,
    /// or a field error for missing resolution text.
    pub fn resolve(
        &mut self,
        actor: &Actor,
        resolution: &Resolution,
        limits: &TextLimits,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, DisputeDomainError> {
        ensure_admin(actor)?;
        self.ensure_open("resolve")?;
        let text = required_text(
            "resolution",
            &resolution.resolution,
            limits.max_description_length,
        )?;
        let notes = optional_text(
            "admin notes",
            resolution.admin_notes.as_deref(),
            limits.max_description_length,
        )?;

        let message = format!("Your report has been resolved: {text}");
        self.status = ReportStatus::Resolved;
        self.resolution = Some(text);
        self.action = Some(resolution.action);
        self.admin_notes = notes;
        self.close(actor, clock);
        Ok(self.closing_notifications("Report resolved", &message))
    }

    /// Closes the report without action.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeDomainError::NotAdmin`],
    /// [`DisputeDomainError::InvalidTransition`] once the report is closed,
    /// or a field error for missing notes.
    pub fn reject(
        &mut self,
        actor: &Actor,
        notes: &str,
        limits: &TextLimits,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, DisputeDomainError> {
        ensure_admin(actor)?;
        self.ensure_open("reject")?;
        let validated = required_text("admin notes", notes, limits.max_description_length)?;

        self.status = ReportStatus::Rejected;
        self.admin_notes = Some(validated);
        self.close(actor, clock);
        Ok(self.closing_notifications(
            "Report closed",
            "The report was reviewed and closed without action.",
        ))
    }

    /// Turns a pre-adjudication snapshot into a write that supersedes the
    /// committed state.
    pub(crate) fn supersede(&mut self, committed: &Self, clock: &impl Clock) {
        self.revision = committed.revision.saturating_add(1);
        self.updated_at = clock.utc();
    }

    fn ensure_open(&self, action: &'static str) -> Result<(), DisputeDomainError> {
        if self.status.is_open() {
            Ok(())
        } else {
            Err(self.invalid_transition(action))
        }
    }

    const fn invalid_transition(&self, action: &'static str) -> DisputeDomainError {
        DisputeDomainError::InvalidTransition {
            report_id: self.id,
            action,
            status: self.status,
        }
    }

    fn close(&mut self, actor: &Actor, clock: &impl Clock) {
        self.reviewed_by = Some(actor.id());
        self.resolved_at = Some(clock.utc());
        self.touch(clock);
    }

    fn closing_notifications(&self, title: &str, message: &str) -> Vec<NotificationIntent> {
        [self.reporter_id, self.reported_user_id]
            .into_iter()
            .map(|user| {
                self.notify(user, NotificationKind::DisputeClosed, title, message.to_owned())
            })
            .collect()
    }

    fn notify(
        &self,
        recipient: UserId,
        kind: NotificationKind,
        title: &str,
        message: String,
    ) -> NotificationIntent {
        NotificationIntent::new(recipient, kind, title, message, self.id.into_inner())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
        self.revision = self.revision.saturating_add(1);
    }
}

const fn ensure_admin(actor: &Actor) -> Result<(), DisputeDomainError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(DisputeDomainError::NotAdmin { actor: actor.id() })
    }
}
