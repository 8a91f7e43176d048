//! Error types for progression operations.

use thiserror::Error;

/// Errors from mutating a [`GameProgress`](crate::GameProgress).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    /// Tried to equip a knife that is not unlocked.
    #[error("Knife not unlocked: {0}")]
    KnifeLocked(String),

    /// Not enough apple coins for a purchase.
    #[error("Insufficient coins: need {needed}, have {available}")]
    InsufficientCoins {
        /// Coins required
        needed: u64,
        /// Coins available
        available: u64,
    },

    /// Level indices start at 1.
    #[error("Invalid level index: {0}")]
    InvalidLevel(u32),
}

/// Result type for progression operations.
pub type ProgressResult<T> = Result<T, ProgressError>;
