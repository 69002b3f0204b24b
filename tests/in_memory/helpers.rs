//! Shared fixtures for in-memory adapter integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use taskmarket::config::TextLimits;
use taskmarket::identity::UserId;
use taskmarket::task::domain::{Amount, NewTask, SearchMethod, Task};

/// Provides a clock for domain construction.
#[fixture]
pub fn clock() -> DefaultClock {
    DefaultClock
}

/// Provides a fresh poster identity.
#[fixture]
pub fn poster() -> UserId {
    UserId::new()
}

/// Builds a draft task owned by `poster`.
///
/// # Errors
///
/// Returns an error if the task request is rejected.
pub fn draft_task(poster: UserId, title: &str) -> Result<Task, eyre::Report> {
    let request = NewTask::new(title, Amount::new(50_000), SearchMethod::Publication);
    Ok(Task::new(
        poster,
        request,
        &TextLimits::default(),
        &DefaultClock,
    )?)
}
