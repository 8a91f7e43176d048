//! # Knifehit Storage
//!
//! Persistence and session plumbing for Knifehit progression.
//!
//! This crate provides:
//! - Key-value preference stores (in-memory and file-backed)
//! - A typed repository for player stats and game progress
//! - Debounced achievement checks and autosave
//! - The gameplay session orchestrator
//! - TOML configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod autosave;
pub mod config;
pub mod debounce;
pub mod error;
pub mod kv;
pub mod repository;
pub mod session;

#[cfg(test)]
mod test_support;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::autosave::*;
    pub use crate::config::*;
    pub use crate::debounce::*;
    pub use crate::error::*;
    pub use crate::kv::*;
    pub use crate::repository::*;
    pub use crate::session::*;
}

pub use prelude::*;
