//! Application services for task lifecycle orchestration.

mod commit;
mod dispatch;
mod lifecycle;

pub(crate) use commit::{commit_transition, roll_back_transition};
pub use dispatch::EffectDispatcher;
pub use lifecycle::{
    TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService, repository_error_kind,
};
