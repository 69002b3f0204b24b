//! Application services for dispute resolution.

mod resolution;

pub use resolution::{DisputeError, DisputeOutcome, DisputeResult, DisputeService};
