//! Shared builders for task unit tests.

use crate::config::TextLimits;
use crate::identity::{Actor, UserId};
use crate::task::domain::{
    Amount, ApplicantPool, NewTask, PaymentStatus, PersistedTaskData, SearchMethod, Task, TaskId,
    TaskStatus,
};
use mockable::{Clock, DefaultClock};

/// The three people involved in a task scenario.
#[derive(Debug, Clone, Copy)]
pub(super) struct Parties {
    pub poster: Actor,
    pub worker: Actor,
    pub stranger: Actor,
}

impl Parties {
    pub fn new() -> Self {
        Self {
            poster: Actor::user(UserId::new()),
            worker: Actor::user(UserId::new()),
            stranger: Actor::user(UserId::new()),
        }
    }
}

/// Builds a task directly in `status`, with the worker assigned.
pub(super) fn task_in(parties: &Parties, status: TaskStatus, search_method: SearchMethod) -> Task {
    let now = DefaultClock.utc();
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        poster_id: parties.poster.id(),
        assigned_to: Some(parties.worker.id()),
        title: "Clean the gutters".to_owned(),
        description: None,
        search_method,
        status,
        applicants: ApplicantPool::new(),
        agreement: None,
        budget: Amount::new(75_000),
        payment_status: PaymentStatus::Unpaid,
        cancellation_reason: None,
        completed_at: None,
        cancelled_at: None,
        created_at: now,
        updated_at: now,
        revision: 3,
    })
}

/// Builds an open publication task with no applicants.
pub(super) fn open_publication(parties: &Parties) -> Task {
    Task::new(
        parties.poster.id(),
        NewTask::new("Assemble a wardrobe", Amount::new(120_000), SearchMethod::Publication)
            .published(),
        &TextLimits::default(),
        &DefaultClock,
    )
    .expect("valid publication task")
}
