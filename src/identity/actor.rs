//! Actor identity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a marketplace user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of the calling actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// A regular user acting as poster or worker.
    User,
    /// A platform administrator.
    Admin,
}

impl ActorRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for ActorRole {
    type Error = ParseActorRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseActorRoleError(value.to_owned())),
        }
    }
}

/// Error returned while parsing an actor role.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown actor role: {0}")]
pub struct ParseActorRoleError(pub String);

/// The resolved calling actor of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    role: ActorRole,
}

impl Actor {
    /// Creates an actor with an explicit role.
    #[must_use]
    pub const fn new(id: UserId, role: ActorRole) -> Self {
        Self { id, role }
    }

    /// Creates a regular user actor.
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self::new(id, ActorRole::User)
    }

    /// Creates an administrator actor.
    #[must_use]
    pub const fn admin(id: UserId) -> Self {
        Self::new(id, ActorRole::Admin)
    }

    /// Returns the actor's user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the actor's role.
    #[must_use]
    pub const fn role(&self) -> ActorRole {
        self.role
    }

    /// Returns `true` for administrator actors.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, ActorRole::Admin)
    }
}
