//! # Knifehit Progression
//!
//! Progression rules for Knifehit.
//!
//! This crate is pure: it never touches storage or clocks.
//! - Player statistics and per-session deltas
//! - Achievement catalog, evaluation and unlock tracking
//! - Resumable game progress and in-level snapshots
//! - Reconciliation between cached and stored progress

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod achievement;
pub mod catalog;
pub mod error;
mod lenient;
pub mod progress;
pub mod reconcile;
pub mod stats;
pub mod tracker;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::achievement::*;
    pub use crate::catalog::{by_tier, definitions, find, CATALOG, PERFECT_AIM_MIN_THROWS};
    pub use crate::error::*;
    pub use crate::progress::*;
    pub use crate::reconcile::*;
    pub use crate::stats::*;
    pub use crate::tracker::*;
}

pub use prelude::*;
