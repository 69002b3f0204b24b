//! Task aggregate root and its lifecycle transitions.
//!
//! Each transition method checks the caller, then the transition table, then
//! payload fields, and only mutates once every check has passed. A failed
//! transition therefore leaves the aggregate untouched. Successful
//! transitions bump the revision and return the notifications they produce.

use super::{
    Agreement, AgreementTerms, Amount, ApplicantPool, NotificationIntent, NotificationKind,
    PaymentStatus, SearchMethod, TaskAction, TaskDomainError, TaskId, TaskStatus,
};
use crate::config::TextLimits;
use crate::error::{optional_text, required_text};
use crate::identity::{Actor, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Maximum characters in a task title.
const MAX_TITLE_LENGTH: usize = 200;

/// Parameters for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Optional task description.
    pub description: Option<String>,
    /// Fixed budget paid out on settlement.
    pub budget: Amount,
    /// How the worker is found.
    pub search_method: SearchMethod,
    /// Whether the task starts `open` instead of `draft`.
    pub publish: bool,
}

impl NewTask {
    /// Creates draft task parameters.
    #[must_use]
    pub fn new(title: impl Into<String>, budget: Amount, search_method: SearchMethod) -> Self {
        Self {
            title: title.into(),
            description: None,
            budget,
            search_method,
            publish: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Creates the task directly in `open` status.
    #[must_use]
    pub fn published(mut self) -> Self {
        self.publish = true;
        self
    }
}

/// The worker's answer to a pending assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmDecision {
    /// Accept and start the task.
    Accept,
    /// Decline the task.
    Reject {
        /// Why the worker declined.
        reason: String,
    },
}

/// Balance credit owed after a completion approval commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementOrder {
    /// Worker to credit.
    pub worker: UserId,
    /// Amount to credit.
    pub amount: Amount,
    /// Notifications to emit once the credit has been applied.
    pub notifications: Vec<NotificationIntent>,
}

/// Which side of a task a report was filed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisputeParties {
    /// The user filing the report.
    pub reporter: UserId,
    /// The other party.
    pub reported: UserId,
    /// Whether the reporter is the poster.
    pub reporter_is_poster: bool,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    poster_id: UserId,
    assigned_to: Option<UserId>,
    title: String,
    description: Option<String>,
    search_method: SearchMethod,
    status: TaskStatus,
    applicants: ApplicantPool,
    agreement: Option<Agreement>,
    budget: Amount,
    payment_status: PaymentStatus,
    cancellation_reason: Option<String>,
    completed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: u64,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning poster.
    pub poster_id: UserId,
    /// Assigned worker, if any.
    pub assigned_to: Option<UserId>,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: Option<String>,
    /// Search method.
    pub search_method: SearchMethod,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Applicant pool.
    pub applicants: ApplicantPool,
    /// Agreement, if any.
    pub agreement: Option<Agreement>,
    /// Budget.
    pub budget: Amount,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Cancellation reason, if cancelled by the poster.
    pub cancellation_reason: Option<String>,
    /// Completion approval timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency revision.
    pub revision: u64,
}

impl Task {
    /// Creates a task owned by `poster`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ZeroBudget`] for a zero budget and field
    /// errors for a blank title or over-long text.
    pub fn new(
        poster: UserId,
        params: NewTask,
        limits: &TextLimits,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = required_text("title", &params.title, MAX_TITLE_LENGTH)?;
        let description = optional_text(
            "description",
            params.description.as_deref(),
            limits.max_description_length,
        )?;
        if params.budget.is_zero() {
            return Err(TaskDomainError::ZeroBudget);
        }

        let timestamp = clock.utc();
        let status = if params.publish {
            TaskStatus::Open
        } else {
            TaskStatus::Draft
        };
        Ok(Self {
            id: TaskId::new(),
            poster_id: poster,
            assigned_to: None,
            title,
            description,
            search_method: params.search_method,
            status,
            applicants: ApplicantPool::new(),
            agreement: None,
            budget: params.budget,
            payment_status: PaymentStatus::Unpaid,
            cancellation_reason: None,
            completed_at: None,
            cancelled_at: None,
            created_at: timestamp,
            updated_at: timestamp,
            revision: 0,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            poster_id: data.poster_id,
            assigned_to: data.assigned_to,
            title: data.title,
            description: data.description,
            search_method: data.search_method,
            status: data.status,
            applicants: data.applicants,
            agreement: data.agreement,
            budget: data.budget,
            payment_status: data.payment_status,
            cancellation_reason: data.cancellation_reason,
            completed_at: data.completed_at,
            cancelled_at: data.cancelled_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
            revision: data.revision,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning poster.
    #[must_use]
    pub const fn poster_id(&self) -> UserId {
        self.poster_id
    }

    /// Returns the assigned worker, if any.
    ///
    /// A cancelled task keeps the worker it had, so `None` does not follow
    /// from the status alone.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the search method.
    #[must_use]
    pub const fn search_method(&self) -> SearchMethod {
        self.search_method
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the applicant pool.
    #[must_use]
    pub const fn applicants(&self) -> &ApplicantPool {
        &self.applicants
    }

    /// Returns the agreement, if any.
    #[must_use]
    pub const fn agreement(&self) -> Option<&Agreement> {
        self.agreement.as_ref()
    }

    /// Returns the budget.
    #[must_use]
    pub const fn budget(&self) -> Amount {
        self.budget
    }

    /// Returns the payment status.
    #[must_use]
    pub const fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Returns the poster's cancellation reason, if any.
    #[must_use]
    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// Returns the completion approval timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the cancellation timestamp.
    #[must_use]
    pub const fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    /// Returns the creation timestamp.
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

    /// Makes a draft task visible.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotPoster`] or
    /// [`TaskDomainError::InvalidTransition`].
    pub fn publish(&mut self, actor: &Actor, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_poster(actor)?;
        self.ensure_allowed(TaskAction::Publish)?;
        self.status = TaskStatus::Open;
        self.touch(clock);
        Ok(())
    }

    /// Adds the actor to the applicant pool.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PosterAsWorker`] for the poster,
    /// [`TaskDomainError::InvalidTransition`] unless the task is an open
    /// publication, and [`TaskDomainError::AlreadyApplied`] for repeat
    /// applications.
    pub fn apply(
        &mut self,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, TaskDomainError> {
        if actor.id() == self.poster_id {
            return Err(TaskDomainError::PosterAsWorker(self.id));
        }
        self.ensure_allowed(TaskAction::Apply)?;
        self.applicants.add(self.id, actor.id(), clock.utc())?;
        self.touch(clock);
        Ok(vec![self.notify(
            self.poster_id,
            NotificationKind::NewApplicant,
            "New applicant",
            format!("A worker applied to \"{}\".", self.title),
        )])
    }

    /// Assigns a specific worker to a `find_worker` task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotPoster`],
    /// [`TaskDomainError::InvalidTransition`] unless the task is a
    /// `find_worker` task in `draft` or `open`, or
    /// [`TaskDomainError::PosterAsWorker`] when assigning the poster.
    pub fn assign_worker(
        &mut self,
        actor: &Actor,
        worker: UserId,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, TaskDomainError> {
        self.ensure_poster(actor)?;
        self.ensure_allowed(TaskAction::AssignWorker)?;
        if worker == self.poster_id {
            return Err(TaskDomainError::PosterAsWorker(self.id));
        }
        self.assigned_to = Some(worker);
        self.status = TaskStatus::Pending;
        self.touch(clock);
        Ok(vec![self.notify(
            worker,
            NotificationKind::TaskOffered,
            "New task offer",
            format!("You have been offered \"{}\".", self.title),
        )])
    }

    /// Accepts a direct offer on a `find_worker` task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignedWorker`] or
    /// [`TaskDomainError::InvalidTransition`].
    pub fn confirm_offer(
        &mut self,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, TaskDomainError> {
        self.ensure_assigned_worker(actor)?;
        self.ensure_allowed(TaskAction::ConfirmOffer)?;
        self.status = TaskStatus::Accepted;
        self.touch(clock);
        Ok(vec![self.notify(
            self.poster_id,
            NotificationKind::TaskConfirmed,
            "Offer accepted",
            format!("The worker accepted your offer for \"{}\".", self.title),
        )])
    }

    /// Applies the assigned worker's answer to a pending assignment.
    ///
    /// Accepting starts the task. Rejecting clears the assignment and sends
    /// the task back to `open` (publication, with the worker's applicant
    /// entry rejected) or `draft` (`find_worker`).
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignedWorker`],
    /// [`TaskDomainError::InvalidTransition`], or a field error when a
    /// rejection carries no reason.
    pub fn confirm(
        &mut self,
        actor: &Actor,
        decision: &ConfirmDecision,
        limits: &TextLimits,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, TaskDomainError> {
        self.ensure_assigned_worker(actor)?;
        match decision {
            ConfirmDecision::Accept => {
                self.ensure_allowed(TaskAction::ConfirmAccept)?;
                self.status = TaskStatus::Active;
                self.touch(clock);
                Ok(vec![self.notify(
                    self.poster_id,
                    NotificationKind::TaskConfirmed,
                    "Task started",
                    format!("The worker started \"{}\".", self.title),
                )])
            }
            ConfirmDecision::Reject { reason } => {
                self.ensure_allowed(TaskAction::ConfirmReject)?;
                let validated = required_text("reason", reason, limits.max_reason_length)?;
                self.status = match self.search_method {
                    SearchMethod::Publication => {
                        self.applicants.withdraw_accepted(actor.id());
                        TaskStatus::Open
                    }
                    SearchMethod::FindWorker => TaskStatus::Draft,
                };
                self.assigned_to = None;
                self.touch(clock);
                Ok(vec![self.notify(
                    self.poster_id,
                    NotificationKind::TaskDeclined,
                    "Task declined",
                    format!("The worker declined \"{}\": {validated}", self.title),
                )])
            }
        }
    }

    /// Writes the agreement as the poster, marking it poster-accepted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotPoster`],
    /// [`TaskDomainError::InvalidTransition`], or clause validation errors.
    pub fn set_agreement(
        &mut self,
        actor: &Actor,
        terms: AgreementTerms,
        limits: &TextLimits,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, TaskDomainError> {
        self.ensure_poster(actor)?;
        self.ensure_allowed(TaskAction::SetAgreement)?;
        let now = clock.utc();
        self.agreement = Some(Agreement::proposed_by_poster(terms, limits, now)?);
        self.touch(clock);
        Ok(self
            .assigned_to
            .map(|worker| {
                self.notify(
                    worker,
                    NotificationKind::AgreementUpdated,
                    "Agreement updated",
                    format!("The agreement for \"{}\" has changed.", self.title),
                )
            })
            .into_iter()
            .collect())
    }

    /// Records the assigned worker's acceptance of the agreement.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignedWorker`],
    /// [`TaskDomainError::InvalidTransition`], or
    /// [`TaskDomainError::AgreementMissing`].
    pub fn accept_agreement(
        &mut self,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, TaskDomainError> {
        self.ensure_assigned_worker(actor)?;
        self.ensure_allowed(TaskAction::AcceptAgreement)?;
        let now = clock.utc();
        let agreement = self
            .agreement
            .as_mut()
            .ok_or(TaskDomainError::AgreementMissing(self.id))?;
        agreement.accept_as_tasker(now);
        self.touch(clock);
        Ok(vec![self.notify(
            self.poster_id,
            NotificationKind::AgreementUpdated,
            "Agreement accepted",
            format!("The worker accepted the agreement for \"{}\".", self.title),
        )])
    }

    /// Marks the work as done on behalf of the assigned worker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignedWorker`] or
    /// [`TaskDomainError::InvalidTransition`].
    pub fn mark_done(
        &mut self,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, TaskDomainError> {
        self.ensure_assigned_worker(actor)?;
        self.ensure_allowed(TaskAction::MarkDone)?;
        self.status = TaskStatus::CompletedWorker;
        self.touch(clock);
        Ok(vec![self.notify(
            self.poster_id,
            NotificationKind::WorkSubmitted,
            "Work submitted",
            format!("\"{}\" is ready for your approval.", self.title),
        )])
    }

    /// Approves completion and returns the settlement owed to the worker.
    ///
    /// `completed_worker -> completed` is the only path to `completed`, so a
    /// second approval fails here instead of settling twice. A task that was
    /// already settled and later resumed from a dispute keeps its
    /// `completed_at` and cannot be approved again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotPoster`] or
    /// [`TaskDomainError::InvalidTransition`].
    pub fn approve_completion(
        &mut self,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<SettlementOrder, TaskDomainError> {
        self.ensure_poster(actor)?;
        self.ensure_allowed(TaskAction::ApproveCompletion)?;
        if self.completed_at.is_some() {
            return Err(self.invalid_transition(TaskAction::ApproveCompletion));
        }
        let worker = self
            .assigned_to
            .ok_or_else(|| self.invalid_transition(TaskAction::ApproveCompletion))?;

        self.status = TaskStatus::Completed;
        self.completed_at = Some(clock.utc());
        self.touch(clock);

        let notifications = vec![
            self.notify(
                worker,
                NotificationKind::PaymentReleased,
                "Payment released",
                format!("{} has been added to your balance for \"{}\".", self.budget, self.title),
            ),
            self.notify(
                self.poster_id,
                NotificationKind::TaskCompleted,
                "Task completed",
                format!("\"{}\" is complete.", self.title),
            ),
        ];
        Ok(SettlementOrder {
            worker,
            amount: self.budget,
            notifications,
        })
    }

    /// Cancels the task on behalf of the poster.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotPoster`],
    /// [`TaskDomainError::InvalidTransition`], or a field error when the
    /// reason is missing.
    pub fn cancel(
        &mut self,
        actor: &Actor,
        reason: &str,
        limits: &TextLimits,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, TaskDomainError> {
        self.ensure_poster(actor)?;
        self.ensure_allowed(TaskAction::Cancel)?;
        let validated = required_text("reason", reason, limits.max_reason_length)?;

        self.status = TaskStatus::Cancelled;
        self.cancelled_at = Some(clock.utc());
        self.touch(clock);
        let notifications = self
            .assigned_to
            .map(|worker| {
                self.notify(
                    worker,
                    NotificationKind::TaskCancelled,
                    "Task cancelled",
                    format!("\"{}\" was cancelled: {validated}", self.title),
                )
            })
            .into_iter()
            .collect();
        self.cancellation_reason = Some(validated);
        Ok(notifications)
    }

    /// Accepts one applicant and rejects every other pending applicant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotPoster`],
    /// [`TaskDomainError::InvalidTransition`] unless the task is an open
    /// publication, or applicant lookup errors.
    pub fn accept_applicant(
        &mut self,
        actor: &Actor,
        applicant: UserId,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, TaskDomainError> {
        self.ensure_poster(actor)?;
        self.ensure_allowed(TaskAction::AcceptApplicant)?;
        let auto_rejected = self.applicants.accept_exclusive(self.id, applicant)?;

        self.assigned_to = Some(applicant);
        self.status = TaskStatus::Pending;
        self.touch(clock);

        let mut notifications = vec![self.notify(
            applicant,
            NotificationKind::TaskOffered,
            "Application accepted",
            format!("Your application for \"{}\" was accepted.", self.title),
        )];
        notifications.extend(auto_rejected.into_iter().map(|user| {
            self.notify(
                user,
                NotificationKind::ApplicationRejected,
                "Application closed",
                format!("Another worker was selected for \"{}\".", self.title),
            )
        }));
        Ok(notifications)
    }

    /// Rejects one pending applicant without changing the task status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotPoster`],
    /// [`TaskDomainError::InvalidTransition`], or applicant lookup errors.
    pub fn reject_applicant(
        &mut self,
        actor: &Actor,
        applicant: UserId,
        clock: &impl Clock,
    ) -> Result<Vec<NotificationIntent>, TaskDomainError> {
        self.ensure_poster(actor)?;
        self.ensure_allowed(TaskAction::RejectApplicant)?;
        self.applicants.reject(self.id, applicant)?;
        self.touch(clock);
        Ok(vec![self.notify(
            applicant,
            NotificationKind::ApplicationRejected,
            "Application rejected",
            format!("Your application for \"{}\" was not accepted.", self.title),
        )])
    }

    /// Freezes the task for a report filed by one of its parties.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotParty`] for outsiders and
    /// [`TaskDomainError::InvalidTransition`] outside `active`,
    /// `completed_worker` and `completed`.
    pub fn open_dispute(
        &mut self,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<DisputeParties, TaskDomainError> {
        let reporter_is_poster = actor.id() == self.poster_id;
        if !reporter_is_poster && self.assigned_to != Some(actor.id()) {
            return Err(TaskDomainError::NotParty {
                task_id: self.id,
                actor: actor.id(),
            });
        }
        self.ensure_allowed(TaskAction::FileReport)?;
        let worker = self
            .assigned_to
            .ok_or_else(|| self.invalid_transition(TaskAction::FileReport))?;
        let parties = if reporter_is_poster {
            DisputeParties {
                reporter: self.poster_id,
                reported: worker,
                reporter_is_poster,
            }
        } else {
            DisputeParties {
                reporter: worker,
                reported: self.poster_id,
                reporter_is_poster,
            }
        };

        self.status = TaskStatus::Disputed;
        self.touch(clock);
        Ok(parties)
    }

    /// Resumes a disputed task after its report was rejected.
    ///
    /// The task always returns to `active`, whatever status it was frozen
    /// from.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAdmin`] or
    /// [`TaskDomainError::InvalidTransition`].
    pub fn restore_after_dispute(
        &mut self,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        ensure_admin(actor)?;
        self.ensure_allowed(TaskAction::RestoreAfterDispute)?;
        self.status = TaskStatus::Active;
        self.touch(clock);
        Ok(())
    }

    /// Cancels a disputed task and marks its payment refunded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAdmin`] or
    /// [`TaskDomainError::InvalidTransition`].
    pub fn refund_after_dispute(
        &mut self,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        ensure_admin(actor)?;
        self.ensure_allowed(TaskAction::RefundAfterDispute)?;
        self.status = TaskStatus::Cancelled;
        self.payment_status = PaymentStatus::Refunded;
        self.cancelled_at = Some(clock.utc());
        self.touch(clock);
        Ok(())
    }

    /// Records the payment provider's invoice state.
    ///
    /// Only `payment_status` changes; the lifecycle status is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAdmin`] for non-admin callers.
    pub fn record_payment_status(
        &mut self,
        actor: &Actor,
        payment_status: PaymentStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        ensure_admin(actor)?;
        self.payment_status = payment_status;
        self.touch(clock);
        Ok(())
    }

    /// Returns the user `actor` may review for this task, if any.
    ///
    /// Only completed tasks are reviewable: the poster reviews the worker
    /// and the worker reviews the poster.
    #[must_use]
    pub fn review_target(&self, actor: &Actor) -> Option<UserId> {
        if self.status != TaskStatus::Completed {
            return None;
        }
        let worker = self.assigned_to?;
        if actor.id() == self.poster_id {
            Some(worker)
        } else if actor.id() == worker {
            Some(self.poster_id)
        } else {
            None
        }
    }

    /// Undoes the settlement markers of `settled` on this stored copy.
    ///
    /// Returns `false` when the copy no longer carries that settlement, so
    /// there is nothing to revert.
    pub(crate) fn revert_settlement(&mut self, settled: &Self, clock: &impl Clock) -> bool {
        if self.completed_at.is_none() || self.completed_at != settled.completed_at {
            return false;
        }
        self.completed_at = None;
        if self.status == TaskStatus::Completed {
            self.status = TaskStatus::CompletedWorker;
        }
        self.touch(clock);
        true
    }

    /// Turns a pre-transition snapshot into a write that supersedes the
    /// committed state, so a failed side effect can be compensated with a
    /// further conditional update.
    pub(crate) fn supersede(&mut self, committed: &Self, clock: &impl Clock) {
        self.revision = committed.revision.saturating_add(1);
        self.updated_at = clock.utc();
    }

    fn ensure_poster(&self, actor: &Actor) -> Result<(), TaskDomainError> {
        if actor.id() != self.poster_id {
            return Err(TaskDomainError::NotPoster {
                task_id: self.id,
                actor: actor.id(),
            });
        }
        Ok(())
    }

    fn ensure_assigned_worker(&self, actor: &Actor) -> Result<(), TaskDomainError> {
        if self.assigned_to != Some(actor.id()) {
            return Err(TaskDomainError::NotAssignedWorker {
                task_id: self.id,
                actor: actor.id(),
            });
        }
        Ok(())
    }

    fn ensure_allowed(&self, action: TaskAction) -> Result<(), TaskDomainError> {
        if action.allowed_from(self.status, self.search_method) {
            Ok(())
        } else {
            Err(self.invalid_transition(action))
        }
    }

    const fn invalid_transition(&self, action: TaskAction) -> TaskDomainError {
        TaskDomainError::InvalidTransition {
            task_id: self.id,
            action,
            status: self.status,
            search_method: self.search_method,
        }
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

const fn ensure_admin(actor: &Actor) -> Result<(), TaskDomainError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(TaskDomainError::NotAdmin { actor: actor.id() })
    }
}
