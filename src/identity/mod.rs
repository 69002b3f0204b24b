//! Calling-actor resolution.
//!
//! The lifecycle engine consumes two identity facts only: the caller's user
//! identifier and whether the caller is an administrator. Session issuance
//! and profile gating live outside this crate behind [`IdentityContext`].

mod actor;
mod context;

pub use actor::{Actor, ActorRole, ParseActorRoleError, UserId};
pub use context::{IdentityContext, IdentityError, StaticIdentity};
