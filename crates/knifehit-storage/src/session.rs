//! Gameplay session orchestration.
//!
//! This module handles everything between "player opened the game" and
//! "player quit":
//! - Folding gameplay events into persisted stats
//! - Debounced achievement checks
//! - Debounced progress autosave
//! - Continue / new game resolution
//!
//! Nothing here reads a clock. Every input carries the `Instant` it happened
//! at and the host calls [`GameSession::poll`] from its frame loop.

use knifehit_progression::{
    resolve_for_continue, AchievementTracker, GameProgress, PlayerStats, SessionStats,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::autosave::{AutosaveOutcome, AutosaveScheduler};
use crate::config::ProgressionConfig;
use crate::debounce::Debouncer;
use crate::error::StorageResult;
use crate::kv::KeyValueStore;
use crate::repository::ProgressRepository;

// ============================================================================
// Session Events
// ============================================================================

/// Events emitted by a session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// An achievement was unlocked during this session.
    AchievementUnlocked {
        /// Achievement id.
        id: &'static str,
        /// Display title.
        title: &'static str,
    },
    /// Progress was written to storage.
    ProgressSaved,
    /// A write failed. It will be retried.
    SaveFailed {
        /// Error message.
        error: String,
    },
}

/// Totals reported when a session ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// Everything recorded during the session.
    pub totals: SessionStats,
    /// Persisted stats after the final flush.
    pub stats: PlayerStats,
    /// Ids unlocked during the session, in unlock order.
    pub newly_unlocked: Vec<&'static str>,
    /// Successful progress writes.
    pub autosaves_completed: u64,
    /// Failed progress writes.
    pub autosave_failures: u64,
}

// ============================================================================
// Game Session
// ============================================================================

/// One gameplay session over a shared repository.
#[derive(Debug)]
pub struct GameSession<S> {
    repo: Arc<ProgressRepository<S>>,
    tracker: AchievementTracker,
    /// Recorded but not yet written.
    pending: SessionStats,
    /// Written during this session.
    totals: SessionStats,
    /// Last stats known to be persisted.
    stats: PlayerStats,
    progress: Option<GameProgress>,
    game_score: u64,
    check: Debouncer,
    autosave: AutosaveScheduler,
    events: Vec<SessionEvent>,
    newly_unlocked: Vec<&'static str>,
    started_at: Instant,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Begin a session.
    ///
    /// The achievement baseline is captured from the stored stats before the
    /// game-start increment, so achievements that increment earns are
    /// reported by the first check.
    pub fn start(
        repo: Arc<ProgressRepository<S>>,
        config: &ProgressionConfig,
        now: Instant,
    ) -> StorageResult<Self> {
        let stats = repo.read_player_stats()?;
        let tracker = AchievementTracker::initialize(&stats, config.achievement_context());
        info!(
            "Session started ({} games played, {} achievements unlocked)",
            stats.games_played,
            tracker.known_unlocked().len()
        );

        let mut session = Self {
            repo,
            tracker,
            pending: SessionStats::new(),
            totals: SessionStats::new(),
            stats,
            progress: None,
            game_score: 0,
            check: Debouncer::new(config.achievement_check_debounce()),
            autosave: AutosaveScheduler::new(config.autosave_debounce()),
            events: Vec::new(),
            newly_unlocked: Vec::new(),
            started_at: now,
        };
        session.pending.record_game_started();
        session.check.schedule(now);
        Ok(session)
    }

    // === Accessors ===

    /// Shared repository.
    #[must_use]
    pub fn repository(&self) -> &Arc<ProgressRepository<S>> {
        &self.repo
    }

    /// Stats as the player currently sees them, including unwritten deltas.
    #[must_use]
    pub fn live_stats(&self) -> PlayerStats {
        self.pending.apply_to(&self.stats)
    }

    /// Last stats known to be persisted.
    #[must_use]
    pub fn persisted_stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Deltas not yet written.
    #[must_use]
    pub fn pending_stats(&self) -> &SessionStats {
        &self.pending
    }

    /// Cached progress.
    #[must_use]
    pub fn progress(&self) -> Option<&GameProgress> {
        self.progress.as_ref()
    }

    /// Achievement tracker.
    #[must_use]
    pub fn tracker(&self) -> &AchievementTracker {
        &self.tracker
    }

    /// Autosave scheduler.
    #[must_use]
    pub fn autosave(&self) -> &AutosaveScheduler {
        &self.autosave
    }

    /// Whether an achievement check is scheduled.
    #[must_use]
    pub fn check_pending(&self) -> bool {
        self.check.is_pending()
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // === Gameplay inputs ===

    /// A knife was thrown.
    pub fn record_throw(&mut self, hit: bool, now: Instant) {
        self.pending.record_throw(hit);
        self.check.schedule(now);
    }

    /// A thrown knife hit an apple.
    pub fn record_apple_hit(&mut self, now: Instant) {
        self.pending.record_apple_hit();
        self.check.schedule(now);
    }

    /// Points were scored in the current game.
    pub fn add_score(&mut self, points: u64, now: Instant) {
        self.game_score = self.game_score.saturating_add(points);
        self.pending.add_score(points, self.game_score);
        self.check.schedule(now);
    }

    /// The player reached `level`.
    pub fn record_level_reached(&mut self, level: u32, now: Instant) {
        self.pending.record_level(level);
        self.check.schedule(now);
    }

    /// The boss of `level` was beaten.
    ///
    /// The level is also recorded on the cached progress, which is then
    /// queued for autosave.
    pub fn record_boss_win(&mut self, level: u32, now: Instant) {
        self.pending.record_boss_win();
        self.check.schedule(now);

        if let Some(progress) = self.progress.as_mut() {
            if progress.record_boss_defeat(level) {
                self.autosave.request(progress.clone(), now);
            }
        }
    }

    /// A knife skin was unlocked.
    pub fn record_knife_unlocked(&mut self, now: Instant) {
        self.pending.record_knife_unlocked();
        self.check.schedule(now);
    }

    /// Replace the cached progress and queue it for autosave.
    pub fn update_progress(&mut self, progress: GameProgress, now: Instant) {
        self.game_score = progress.score;
        self.autosave.request(progress.clone(), now);
        self.progress = Some(progress);
    }

    // === Scheduling ===

    /// Run whatever has come due.
    pub fn poll(&mut self, now: Instant) {
        if self.check.fire_if_due(now) {
            self.run_check(now);
        }
        if let Some(outcome) = self.autosave.poll(now, &self.repo) {
            self.push_autosave_event(outcome);
        }
    }

    // === Continue / New game ===

    /// Resolve the progress to continue from and cache it.
    ///
    /// The cached copy competes with the stored one. A snapshot still
    /// waiting for autosave is replaced by the winner, so a less advanced
    /// copy is never written over the stored one.
    pub fn resume_progress(&mut self) -> StorageResult<Option<GameProgress>> {
        let stored = self.repo.read_game_progress()?;
        let resolved = resolve_for_continue(self.progress.take(), stored);
        if let Some(progress) = &resolved {
            debug!(
                "Resuming at level {} (snapshot: {})",
                progress.effective_level(),
                progress.has_active_level()
            );
            self.game_score = progress.score;
        }
        self.autosave.replace_pending(resolved.clone());
        self.progress.clone_from(&resolved);
        Ok(resolved)
    }

    /// Start a new game, carrying coins and knives over from the resumable
    /// progress.
    pub fn start_new_game(&mut self, now: Instant) -> StorageResult<GameProgress> {
        let previous = self.resume_progress()?;
        let fresh = GameProgress::new_game_from(previous.as_ref(), self.repo.default_knife());
        info!(
            "New game started ({} coins, {} knives carried over)",
            fresh.apple_coins,
            fresh.unlocked_knife_assets.len()
        );
        self.update_progress(fresh.clone(), now);
        Ok(fresh)
    }

    /// End the session.
    ///
    /// Elapsed playtime is recorded in whole minutes. Stats and progress are
    /// written immediately and a final achievement check runs.
    pub fn end(&mut self, now: Instant) -> SessionSummary {
        let minutes = now.saturating_duration_since(self.started_at).as_secs() / 60;
        if minutes > 0 {
            self.pending.add_playtime_minutes(minutes);
        }

        self.check.cancel();
        self.run_check(now);
        if let Some(outcome) = self.autosave.flush(&self.repo) {
            self.push_autosave_event(outcome);
        }

        info!(
            "Session ended ({} minutes, {} achievements unlocked)",
            minutes,
            self.newly_unlocked.len()
        );

        SessionSummary {
            totals: self.totals,
            stats: self.live_stats(),
            newly_unlocked: self.newly_unlocked.clone(),
            autosaves_completed: self.autosave.completed(),
            autosave_failures: self.autosave.failed(),
        }
    }

    fn run_check(&mut self, now: Instant) {
        self.flush_stats(now);

        let stats = self.live_stats();
        for definition in self.tracker.check_for_new_achievements(&stats) {
            info!("Achievement unlocked: {} ({})", definition.title, definition.id);
            self.newly_unlocked.push(definition.id);
            self.events.push(SessionEvent::AchievementUnlocked {
                id: definition.id,
                title: definition.title,
            });
        }
    }

    /// On failure the delta is kept and the check re-armed so the next
    /// poll writes it again.
    fn flush_stats(&mut self, now: Instant) {
        if self.pending.is_empty() {
            return;
        }

        let delta = self.pending;
        match self.repo.update_player_stats(|stored| delta.apply_to(&stored)) {
            Ok(stats) => {
                self.stats = stats;
                self.totals.merge(&delta);
                self.pending = SessionStats::new();
            },
            Err(e) => {
                warn!("Failed to write player stats, keeping delta: {e}");
                self.events.push(SessionEvent::SaveFailed {
                    error: e.to_string(),
                });
                self.check.schedule(now);
            },
        }
    }

    fn push_autosave_event(&mut self, outcome: AutosaveOutcome) {
        let event = match outcome {
            AutosaveOutcome::Saved => SessionEvent::ProgressSaved,
            AutosaveOutcome::Failed(error) => SessionEvent::SaveFailed { error },
        };
        self.events.push(event);
    }
}
