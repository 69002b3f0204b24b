//! Balance-relevant view of a user account.

use super::Amount;
use crate::identity::UserId;
use serde::{Deserialize, Serialize};

/// Earnings and verification state of a user.
///
/// Balances only move through settlement; the verification flag is owned by
/// identity verification and dispute adjudication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Account owner.
    pub user_id: UserId,
    /// Withdrawable balance.
    pub balance: Amount,
    /// Lifetime earnings.
    pub total_earnings: Amount,
    /// Number of settled tasks.
    pub completed_tasks: u32,
    /// Whether the user's identity is verified.
    pub is_verified: bool,
}

impl UserAccount {
    /// Creates an empty, verified account.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            balance: Amount::ZERO,
            total_earnings: Amount::ZERO,
            completed_tasks: 0,
            is_verified: true,
        }
    }
}
