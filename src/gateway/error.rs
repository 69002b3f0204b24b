//! Boundary error carrying a stable kind and a readable message.

use crate::dispute::services::DisputeError;
use crate::error::ErrorKind;
use crate::identity::IdentityError;
use crate::task::services::TaskLifecycleError;
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure returned from a gateway operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    /// Stable classification.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl GatewayError {
    /// Creates an error from a kind and message.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind.status_code()
    }
}

impl From<IdentityError> for GatewayError {
    fn from(err: IdentityError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<TaskLifecycleError> for GatewayError {
    fn from(err: TaskLifecycleError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<DisputeError> for GatewayError {
    fn from(err: DisputeError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}
