//! Taskmarket: task lifecycle and settlement engine for a labour marketplace.
//!
//! This crate governs a task from creation through applicant selection or
//! direct assignment, worker confirmation, execution, completion approval,
//! financial settlement, cancellation and dispute resolution.
//!
//! # Architecture
//!
//! Taskmarket follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage, ledger and notifications
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//! - **Services**: Orchestration of domain transitions and their side effects
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle state machine, applicant selection and settlement
//! - [`dispute`]: Report intake and admin adjudication
//! - [`gateway`]: Actor-resolving command surface returning typed errors
//! - [`identity`]: Calling actor resolution
//! - [`config`]: Runtime configuration
//! - [`error`]: Cross-cutting error taxonomy

pub mod config;
pub mod dispute;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod task;
