//! Notification emitter port.

use crate::task::domain::NotificationIntent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Creates notification records. Delivery transport is out of scope.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationEmitter: Send + Sync {
    /// Persists one notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when the record cannot be created.
    /// Callers treat this as best-effort and never fail a transition on it.
    async fn emit(&self, notification: &NotificationIntent) -> Result<(), NotificationError>;
}

/// Error returned when a notification record cannot be created.
#[derive(Debug, Clone, Error)]
#[error("failed to create notification: {0}")]
pub struct NotificationError(pub Arc<dyn std::error::Error + Send + Sync>);

impl NotificationError {
    /// Wraps an underlying error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
