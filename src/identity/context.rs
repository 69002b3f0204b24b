//! Identity context port and a fixed-actor adapter.

use super::Actor;
use crate::error::ErrorKind;
use async_trait::async_trait;
use thiserror::Error;

/// Errors returned while resolving the calling actor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// No authenticated actor is attached to the request.
    #[error("no authenticated actor")]
    Unauthenticated,
}

impl IdentityError {
    /// Classifies the error for the operation boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated => ErrorKind::Unauthenticated,
        }
    }
}

/// Resolves the actor on whose behalf an operation runs.
#[async_trait]
pub trait IdentityContext: Send + Sync {
    /// Returns the current actor.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unauthenticated`] when no actor is present.
    async fn current_actor(&self) -> Result<Actor, IdentityError>;
}

/// Identity context that always yields the same, optional, actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticIdentity {
    actor: Option<Actor>,
}

impl StaticIdentity {
    /// Creates a context authenticated as `actor`.
    #[must_use]
    pub const fn authenticated(actor: Actor) -> Self {
        Self { actor: Some(actor) }
    }

    /// Creates a context with no authenticated actor.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { actor: None }
    }
}

#[async_trait]
impl IdentityContext for StaticIdentity {
    async fn current_actor(&self) -> Result<Actor, IdentityError> {
        self.actor.ok_or(IdentityError::Unauthenticated)
    }
}
