//! Notification emitter that records intents in memory.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::identity::UserId;
use crate::task::{
    domain::NotificationIntent,
    ports::{NotificationEmitter, NotificationError},
};

/// Emitter that keeps every notification it is given.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationEmitter {
    sent: Arc<Mutex<Vec<NotificationIntent>>>,
}

impl RecordingNotificationEmitter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded notification in emission order.
    #[must_use]
    pub fn sent(&self) -> Vec<NotificationIntent> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Returns the notifications addressed to `user`.
    #[must_use]
    pub fn sent_to(&self, user: UserId) -> Vec<NotificationIntent> {
        self.sent()
            .into_iter()
            .filter(|notification| notification.recipient == user)
            .collect()
    }
}

#[async_trait]
impl NotificationEmitter for RecordingNotificationEmitter {
    async fn emit(&self, notification: &NotificationIntent) -> Result<(), NotificationError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|err| NotificationError::new(std::io::Error::other(err.to_string())))?;
        sent.push(notification.clone());
        Ok(())
    }
}
