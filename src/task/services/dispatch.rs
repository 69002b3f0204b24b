//! Best-effort dispatch of notification intents.

use crate::config::NotificationConfig;
use crate::task::{domain::NotificationIntent, ports::NotificationEmitter};
use std::sync::Arc;
use tracing::{debug, warn};

/// Hands committed transitions' notification intents to the emitter.
///
/// Failures are logged and swallowed: by the time effects are dispatched
/// the transition has already committed.
pub struct EffectDispatcher<N>
where
    N: NotificationEmitter,
{
    emitter: Arc<N>,
    config: NotificationConfig,
}

impl<N> Clone for EffectDispatcher<N>
where
    N: NotificationEmitter,
{
    fn clone(&self) -> Self {
        Self {
            emitter: Arc::clone(&self.emitter),
            config: self.config,
        }
    }
}

impl<N> EffectDispatcher<N>
where
    N: NotificationEmitter,
{
    /// Creates a dispatcher.
    #[must_use]
    pub const fn new(emitter: Arc<N>, config: NotificationConfig) -> Self {
        Self { emitter, config }
    }

    /// Emits every intent, logging and discarding failures.
    pub async fn dispatch(&self, effects: Vec<NotificationIntent>) {
        if !self.config.enabled {
            debug!(count = effects.len(), "notifications disabled; dropping intents");
            return;
        }
        for intent in effects {
            if let Err(err) = self.emitter.emit(&intent).await {
                warn!(
                    recipient = %intent.recipient,
                    kind = intent.kind.as_str(),
                    related_id = %intent.related_id,
                    error = %err,
                    "failed to create notification"
                );
            }
        }
    }
}
