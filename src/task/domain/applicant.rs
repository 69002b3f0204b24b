//! Applicant pool for publication-method tasks.
//!
//! The pool is an ordered collection owned by its task. Accepting an
//! applicant rejects every other pending entry in the same mutation, so a
//! single document write carries the whole "exactly one accepted" update.

use super::{TaskDomainError, TaskId};
use crate::identity::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of one applicant entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantStatus {
    /// Awaiting the poster's decision.
    Pending,
    /// Selected by the poster.
    Accepted,
    /// Declined by the poster, auto-rejected, or withdrew from an offer.
    Rejected,
}

impl ApplicantStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One worker's application to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    user_id: UserId,
    status: ApplicantStatus,
    applied_at: DateTime<Utc>,
}

impl Applicant {
    /// Creates a pending application.
    #[must_use]
    pub const fn new(user_id: UserId, applied_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            status: ApplicantStatus::Pending,
            applied_at,
        }
    }

    /// Returns the applying user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the entry status.
    #[must_use]
    pub const fn status(&self) -> ApplicantStatus {
        self.status
    }

    /// Returns when the application was made.
    #[must_use]
    pub const fn applied_at(&self) -> DateTime<Utc> {
        self.applied_at
    }
}

/// Ordered applicant collection of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantPool(Vec<Applicant>);

impl ApplicantPool {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Rebuilds a pool from persisted entries.
    #[must_use]
    pub const fn from_entries(entries: Vec<Applicant>) -> Self {
        Self(entries)
    }

    /// Returns the entries in application order.
    #[must_use]
    pub fn entries(&self) -> &[Applicant] {
        &self.0
    }

    /// Returns `true` when nobody has applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the entry for `user_id`, if any.
    #[must_use]
    pub fn get(&self, user_id: UserId) -> Option<&Applicant> {
        self.0.iter().find(|entry| entry.user_id == user_id)
    }

    /// Returns the accepted applicant, if any.
    #[must_use]
    pub fn accepted(&self) -> Option<UserId> {
        self.0
            .iter()
            .find(|entry| entry.status == ApplicantStatus::Accepted)
            .map(Applicant::user_id)
    }

    /// Returns the applicants still awaiting a decision.
    pub fn pending(&self) -> impl Iterator<Item = UserId> + '_ {
        self.0
            .iter()
            .filter(|entry| entry.status == ApplicantStatus::Pending)
            .map(Applicant::user_id)
    }

    /// Appends a pending application.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyApplied`] when the user already has
    /// an entry, whatever its status.
    pub fn add(
        &mut self,
        task_id: TaskId,
        user_id: UserId,
        applied_at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if self.get(user_id).is_some() {
            return Err(TaskDomainError::AlreadyApplied {
                task_id,
                applicant: user_id,
            });
        }
        self.0.push(Applicant::new(user_id, applied_at));
        Ok(())
    }

    /// Accepts `user_id` and rejects every other pending entry.
    ///
    /// Returns the users whose entries were auto-rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ApplicantNotFound`] for unknown users and
    /// [`TaskDomainError::ApplicantNotPending`] when the entry was already
    /// decided or another entry is already accepted.
    pub fn accept_exclusive(
        &mut self,
        task_id: TaskId,
        user_id: UserId,
    ) -> Result<Vec<UserId>, TaskDomainError> {
        self.ensure_pending(task_id, user_id)?;
        if let Some(current) = self.accepted() {
            return Err(TaskDomainError::ApplicantNotPending {
                task_id,
                applicant: current,
                status: ApplicantStatus::Accepted,
            });
        }

        let mut auto_rejected = Vec::new();
        for entry in &mut self.0 {
            if entry.user_id == user_id {
                entry.status = ApplicantStatus::Accepted;
            } else if entry.status == ApplicantStatus::Pending {
                entry.status = ApplicantStatus::Rejected;
                auto_rejected.push(entry.user_id);
            }
        }
        Ok(auto_rejected)
    }

    /// Rejects a pending entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ApplicantNotFound`] for unknown users and
    /// [`TaskDomainError::ApplicantNotPending`] when the entry was already
    /// decided.
    pub fn reject(&mut self, task_id: TaskId, user_id: UserId) -> Result<(), TaskDomainError> {
        self.ensure_pending(task_id, user_id)?;
        self.set_status(user_id, ApplicantStatus::Rejected);
        Ok(())
    }

    /// Marks the accepted entry of a worker who declined the offer as
    /// rejected. The entry is never re-accepted.
    pub(crate) fn withdraw_accepted(&mut self, user_id: UserId) {
        self.set_status(user_id, ApplicantStatus::Rejected);
    }

    fn set_status(&mut self, user_id: UserId, status: ApplicantStatus) {
        if let Some(entry) = self.0.iter_mut().find(|entry| entry.user_id == user_id) {
            entry.status = status;
        }
    }

    fn ensure_pending(&self, task_id: TaskId, user_id: UserId) -> Result<(), TaskDomainError> {
        let entry = self
            .get(user_id)
            .ok_or(TaskDomainError::ApplicantNotFound {
                task_id,
                applicant: user_id,
            })?;
        if entry.status != ApplicantStatus::Pending {
            return Err(TaskDomainError::ApplicantNotPending {
                task_id,
                applicant: user_id,
                status: entry.status,
            });
        }
        Ok(())
    }
}
