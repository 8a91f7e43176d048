//! Debounced autosave of game progress.
//!
//! This module provides:
//! - `AutosaveScheduler`: coalesces progress updates into one write per quiet window
//! - `AutosaveOutcome`: what a write attempt did
//!
//! Write failures never propagate to the caller. They are logged and the
//! snapshot stays pending so the next poll writes it again.

use knifehit_progression::GameProgress;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::debounce::Debouncer;
use crate::kv::KeyValueStore;
use crate::repository::ProgressRepository;

/// Result of a single write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutosaveOutcome {
    /// The pending snapshot was written.
    Saved,
    /// The write failed; the snapshot is still pending.
    Failed(String),
}

/// Owns the latest unsaved progress snapshot and the debounce timer for it.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    debouncer: Debouncer,
    pending: Option<GameProgress>,
    completed: u64,
    failed: u64,
    last_error: Option<String>,
}

impl AutosaveScheduler {
    /// Create a scheduler with the given quiet window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(window),
            pending: None,
            completed: 0,
            failed: 0,
            last_error: None,
        }
    }

    /// Replace the pending snapshot and restart the quiet window.
    pub fn request(&mut self, progress: GameProgress, now: Instant) {
        self.pending = Some(progress);
        self.debouncer.schedule(now);
    }

    /// Swap the waiting snapshot without touching the quiet window.
    ///
    /// Does nothing when no snapshot is waiting. `None` drops the waiting
    /// snapshot and disarms the timer.
    pub fn replace_pending(&mut self, progress: Option<GameProgress>) {
        if self.pending.is_none() {
            return;
        }
        match progress {
            Some(progress) => self.pending = Some(progress),
            None => {
                self.pending = None;
                self.debouncer.cancel();
            },
        }
    }

    /// Whether a snapshot is waiting to be written.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The snapshot waiting to be written.
    #[must_use]
    pub fn pending(&self) -> Option<&GameProgress> {
        self.pending.as_ref()
    }

    /// Number of successful writes.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Number of failed writes.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Message of the most recent failure, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Write the pending snapshot if its quiet window has elapsed.
    pub fn poll<S: KeyValueStore>(
        &mut self,
        now: Instant,
        repo: &ProgressRepository<S>,
    ) -> Option<AutosaveOutcome> {
        if !self.debouncer.fire_if_due(now) {
            return None;
        }
        let outcome = self.write_pending(repo)?;
        if matches!(outcome, AutosaveOutcome::Failed(_)) {
            self.debouncer.schedule(now);
        }
        Some(outcome)
    }

    /// Write the pending snapshot now, ignoring the quiet window.
    pub fn flush<S: KeyValueStore>(
        &mut self,
        repo: &ProgressRepository<S>,
    ) -> Option<AutosaveOutcome> {
        self.debouncer.cancel();
        self.write_pending(repo)
    }

    fn write_pending<S: KeyValueStore>(
        &mut self,
        repo: &ProgressRepository<S>,
    ) -> Option<AutosaveOutcome> {
        let progress = self.pending.as_ref()?;

        match repo.write_game_progress(progress) {
            Ok(()) => {
                info!(
                    "Autosaved progress (level {}, score {})",
                    progress.level_index, progress.score
                );
                self.pending = None;
                self.completed += 1;
                self.last_error = None;
                Some(AutosaveOutcome::Saved)
            },
            Err(e) => {
                warn!("Autosave failed, will retry: {e}");
                self.failed += 1;
                let message = e.to_string();
                self.last_error = Some(message.clone());
                Some(AutosaveOutcome::Failed(message))
            },
        }
    }
}
