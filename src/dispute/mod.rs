//! Dispute resolution.
//!
//! Either party of a running or finished task may file a report, which
//! freezes the task in `disputed`. An admin then rejects the report, which
//! resumes the task, or resolves it with a compensating action against the
//! task or the reported user. Report status changes use the same
//! status-and-revision conditional update as task transitions.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
