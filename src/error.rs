//! Error taxonomy shared by every operation boundary.
//!
//! Service errors are specific to their bounded context, but each one maps
//! onto an [`ErrorKind`] so callers can distinguish a wrong role from a stale
//! view of task state without matching on context-specific variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable classification of an operation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No calling actor could be resolved.
    Unauthenticated,
    /// The actor is not allowed to perform the operation.
    Forbidden,
    /// The task, report, applicant or account does not exist.
    NotFound,
    /// The current status does not permit the operation, including lost races.
    StateConflict,
    /// A required field is missing or invalid.
    Validation,
    /// Storage or ledger failure; the operation was not committed.
    Internal,
}

impl ErrorKind {
    /// Returns the stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::StateConflict => "state_conflict",
            Self::Validation => "validation_error",
            Self::Internal => "internal",
        }
    }

    /// Returns the HTTP status code conventionally used for this kind.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::StateConflict => 409,
            Self::Validation => 422,
            Self::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Validation failure on a free-text payload field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The field is absent or blank after trimming.
    #[error("{0} must not be empty")]
    Missing(&'static str),
    /// The field exceeds its configured character limit.
    #[error("{field} exceeds {max} characters")]
    TooLong {
        /// Payload field name.
        field: &'static str,
        /// Configured character limit.
        max: usize,
    },
}

/// Trims a required text field and enforces its length limit.
///
/// # Errors
///
/// Returns [`FieldError::Missing`] for blank input and
/// [`FieldError::TooLong`] when the trimmed value exceeds `max` characters.
pub fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Missing(field));
    }
    if trimmed.chars().count() > max {
        return Err(FieldError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Normalizes an optional text field; blank input becomes `None`.
///
/// # Errors
///
/// Returns [`FieldError::TooLong`] when the trimmed value exceeds `max`
/// characters.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldError> {
    match value.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => required_text(field, text, max).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, FieldError, optional_text, required_text};
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Unauthenticated, "unauthenticated", 401)]
    #[case(ErrorKind::Forbidden, "forbidden", 403)]
    #[case(ErrorKind::NotFound, "not_found", 404)]
    #[case(ErrorKind::StateConflict, "state_conflict", 409)]
    #[case(ErrorKind::Validation, "validation_error", 422)]
    #[case(ErrorKind::Internal, "internal", 500)]
    fn error_kind_maps_to_stable_code_and_status(
        #[case] kind: ErrorKind,
        #[case] code: &str,
        #[case] status: u16,
    ) {
        assert_eq!(kind.code(), code);
        assert_eq!(kind.status_code(), status);
    }

    #[rstest]
    fn state_conflict_is_distinct_from_forbidden() {
        assert_ne!(
            ErrorKind::StateConflict.status_code(),
            ErrorKind::Forbidden.status_code()
        );
    }

    #[rstest]
    #[case("  late payment  ", Ok("late payment".to_owned()))]
    #[case("   ", Err(FieldError::Missing("reason")))]
    #[case("abcdef", Err(FieldError::TooLong { field: "reason", max: 5 }))]
    fn required_text_trims_and_bounds(
        #[case] raw: &str,
        #[case] expected: Result<String, FieldError>,
    ) {
        assert_eq!(required_text("reason", raw, 5), expected);
    }

    #[rstest]
    fn optional_text_maps_blank_to_none() {
        assert_eq!(optional_text("description", Some("  "), 10), Ok(None));
        assert_eq!(optional_text("description", None, 10), Ok(None));
        assert_eq!(
            optional_text("description", Some(" ok "), 10),
            Ok(Some("ok".to_owned()))
        );
    }
}
