//! Actor-resolving command surface.
//!
//! Each operation takes a task or report identifier and a payload, resolves
//! the calling actor through [`IdentityContext`](crate::identity::IdentityContext),
//! dispatches to the lifecycle or dispute service, and returns the resulting
//! status or a [`GatewayError`] carrying a stable [`ErrorKind`](crate::error::ErrorKind).

mod command;
mod error;
mod marketplace;

pub use command::{CommandOutcome, ReportCommand, ReportSummary, TaskCommand};
pub use error::{GatewayError, GatewayResult};
pub use marketplace::Gateway;
