//! Task lifecycle management.
//!
//! Tasks move through a status machine that depends on how the worker is
//! found: publication tasks collect applicants, `find_worker` tasks are
//! offered to one worker directly. Every transition is committed with a
//! conditional update on the task's status and revision, so concurrent
//! writers cannot both succeed. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
