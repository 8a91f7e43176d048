//! Lifetime player statistics.
//!
//! This module provides:
//! - `PlayerStats`: the persisted lifetime counters
//! - `Metric`: named numeric views into `PlayerStats` used by achievements
//! - `SessionStats`: a per-session delta that is folded into `PlayerStats`

use serde::{Deserialize, Serialize};

use crate::lenient;

// ============================================================================
// Player Stats
// ============================================================================

/// Cumulative lifetime counters for a player.
///
/// `accuracy` is stored for display convenience but is always derivable from
/// `successful_hits` and `total_knives_thrown`; see [`PlayerStats::computed_accuracy`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    /// Sum of every game's score.
    #[serde(deserialize_with = "lenient::as_u64")]
    pub total_score: u64,
    /// Best single-game score.
    #[serde(deserialize_with = "lenient::as_u64")]
    pub high_score: u64,
    /// Knives thrown across all games.
    #[serde(deserialize_with = "lenient::as_u64")]
    pub total_knives_thrown: u64,
    /// Knives that stuck in the target.
    #[serde(deserialize_with = "lenient::as_u64")]
    pub successful_hits: u64,
    /// Hit percentage (0-100). Derived field.
    #[serde(deserialize_with = "lenient::as_f64")]
    pub accuracy: f64,
    /// Apples sliced.
    #[serde(deserialize_with = "lenient::as_u64")]
    pub total_apples_hit: u64,
    /// Highest level index reached.
    #[serde(deserialize_with = "lenient::as_u32")]
    pub max_level_reached: u32,
    /// Boss levels cleared.
    #[serde(deserialize_with = "lenient::as_u32")]
    pub boss_fights_won: u32,
    /// Minutes spent in gameplay.
    #[serde(deserialize_with = "lenient::as_u64")]
    pub total_playtime_minutes: u64,
    /// Games started.
    #[serde(deserialize_with = "lenient::as_u64")]
    pub games_played: u64,
    /// Knife skins unlocked.
    #[serde(deserialize_with = "lenient::as_u32")]
    pub knives_unlocked: u32,
}

impl PlayerStats {
    /// All-zero baseline used for first launch and reset.
    #[must_use]
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Hit percentage recomputed from the raw counters, clamped to 0-100.
    ///
    /// Zero when nothing has been thrown or nothing has hit.
    #[must_use]
    pub fn computed_accuracy(&self) -> f64 {
        if self.total_knives_thrown == 0 || self.successful_hits == 0 {
            return 0.0;
        }
        let ratio = self.successful_hits as f64 / self.total_knives_thrown as f64 * 100.0;
        ratio.clamp(0.0, 100.0)
    }

    /// Returns a copy with `accuracy` brought in line with the counters.
    #[must_use]
    pub fn with_recomputed_accuracy(mut self) -> Self {
        self.accuracy = self.computed_accuracy();
        self
    }

    /// Set score counters.
    #[must_use]
    pub fn with_scores(mut self, total_score: u64, high_score: u64) -> Self {
        self.total_score = total_score;
        self.high_score = high_score;
        self
    }

    /// Set throw counters (accuracy is recomputed).
    #[must_use]
    pub fn with_throws(mut self, thrown: u64, hits: u64) -> Self {
        self.total_knives_thrown = thrown;
        self.successful_hits = hits;
        self.with_recomputed_accuracy()
    }

    /// Set apples hit.
    #[must_use]
    pub fn with_apples_hit(mut self, apples: u64) -> Self {
        self.total_apples_hit = apples;
        self
    }

    /// Set the highest level reached.
    #[must_use]
    pub fn with_max_level(mut self, level: u32) -> Self {
        self.max_level_reached = level;
        self
    }

    /// Set boss fights won.
    #[must_use]
    pub fn with_boss_wins(mut self, wins: u32) -> Self {
        self.boss_fights_won = wins;
        self
    }

    /// Set playtime in minutes.
    #[must_use]
    pub fn with_playtime_minutes(mut self, minutes: u64) -> Self {
        self.total_playtime_minutes = minutes;
        self
    }

    /// Set games played.
    #[must_use]
    pub fn with_games_played(mut self, games: u64) -> Self {
        self.games_played = games;
        self
    }

    /// Set knives unlocked.
    #[must_use]
    pub fn with_knives_unlocked(mut self, knives: u32) -> Self {
        self.knives_unlocked = knives;
        self
    }

    /// Read a metric as a float.
    #[must_use]
    pub fn metric(&self, metric: Metric) -> f64 {
        metric.read(self)
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// A named numeric field of [`PlayerStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// `total_score`
    TotalScore,
    /// `high_score`
    HighScore,
    /// `total_knives_thrown`
    KnivesThrown,
    /// `successful_hits`
    SuccessfulHits,
    /// Accuracy, always read through `computed_accuracy`.
    Accuracy,
    /// `total_apples_hit`
    ApplesHit,
    /// `max_level_reached`
    MaxLevelReached,
    /// `boss_fights_won`
    BossFightsWon,
    /// `total_playtime_minutes`
    PlaytimeMinutes,
    /// `games_played`
    GamesPlayed,
    /// `knives_unlocked`
    KnivesUnlocked,
}

impl Metric {
    /// Every metric, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::TotalScore,
        Self::HighScore,
        Self::KnivesThrown,
        Self::SuccessfulHits,
        Self::Accuracy,
        Self::ApplesHit,
        Self::MaxLevelReached,
        Self::BossFightsWon,
        Self::PlaytimeMinutes,
        Self::GamesPlayed,
        Self::KnivesUnlocked,
    ];

    /// Select this metric's value from `stats`.
    #[must_use]
    pub fn read(self, stats: &PlayerStats) -> f64 {
        match self {
            Self::TotalScore => stats.total_score as f64,
            Self::HighScore => stats.high_score as f64,
            Self::KnivesThrown => stats.total_knives_thrown as f64,
            Self::SuccessfulHits => stats.successful_hits as f64,
            // The stored field can lag behind the counters.
            Self::Accuracy => stats.computed_accuracy(),
            Self::ApplesHit => stats.total_apples_hit as f64,
            Self::MaxLevelReached => f64::from(stats.max_level_reached),
            Self::BossFightsWon => f64::from(stats.boss_fights_won),
            Self::PlaytimeMinutes => stats.total_playtime_minutes as f64,
            Self::GamesPlayed => stats.games_played as f64,
            Self::KnivesUnlocked => f64::from(stats.knives_unlocked),
        }
    }
}

// ============================================================================
// Session Stats
// ============================================================================

/// Statistics accumulated during one gameplay session, not yet folded into
/// the persisted [`PlayerStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Knives thrown.
    pub knives_thrown: u64,
    /// Knives that hit.
    pub hits: u64,
    /// Apples hit.
    pub apples_hit: u64,
    /// Points scored.
    pub score: u64,
    /// Best single-game score seen in the session.
    pub best_game_score: u64,
    /// Boss fights won.
    pub boss_fights_won: u32,
    /// Highest level index reached.
    pub highest_level: u32,
    /// Knives unlocked.
    pub knives_unlocked: u32,
    /// Playtime in minutes.
    pub playtime_minutes: u64,
    /// Games started.
    pub games_started: u64,
}

impl SessionStats {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Record one throw.
    pub fn record_throw(&mut self, hit: bool) {
        self.knives_thrown = self.knives_thrown.saturating_add(1);
        if hit {
            self.hits = self.hits.saturating_add(1);
        }
    }

    /// Record an apple hit.
    pub fn record_apple_hit(&mut self) {
        self.apples_hit = self.apples_hit.saturating_add(1);
    }

    /// Add points; `game_score` is the running score of the current game.
    pub fn add_score(&mut self, points: u64, game_score: u64) {
        self.score = self.score.saturating_add(points);
        self.best_game_score = self.best_game_score.max(game_score);
    }

    /// Record reaching a level.
    pub fn record_level(&mut self, level: u32) {
        self.highest_level = self.highest_level.max(level);
    }

    /// Record a boss win.
    pub fn record_boss_win(&mut self) {
        self.boss_fights_won = self.boss_fights_won.saturating_add(1);
    }

    /// Record a knife unlock.
    pub fn record_knife_unlocked(&mut self) {
        self.knives_unlocked = self.knives_unlocked.saturating_add(1);
    }

    /// Record a game start.
    pub fn record_game_started(&mut self) {
        self.games_started = self.games_started.saturating_add(1);
    }

    /// Add playtime.
    pub fn add_playtime_minutes(&mut self, minutes: u64) {
        self.playtime_minutes = self.playtime_minutes.saturating_add(minutes);
    }

    /// Combine another accumulator into this one.
    pub fn merge(&mut self, other: &Self) {
        self.knives_thrown = self.knives_thrown.saturating_add(other.knives_thrown);
        self.hits = self.hits.saturating_add(other.hits);
        self.apples_hit = self.apples_hit.saturating_add(other.apples_hit);
        self.score = self.score.saturating_add(other.score);
        self.best_game_score = self.best_game_score.max(other.best_game_score);
        self.boss_fights_won = self.boss_fights_won.saturating_add(other.boss_fights_won);
        self.highest_level = self.highest_level.max(other.highest_level);
        self.knives_unlocked = self.knives_unlocked.saturating_add(other.knives_unlocked);
        self.playtime_minutes = self.playtime_minutes.saturating_add(other.playtime_minutes);
        self.games_started = self.games_started.saturating_add(other.games_started);
    }

    /// Fold this delta into `stats`.
    ///
    /// Counters are summed, `high_score` and `max_level_reached` keep the
    /// maximum, and accuracy is recomputed.
    #[must_use]
    pub fn apply_to(&self, stats: &PlayerStats) -> PlayerStats {
        PlayerStats {
            total_score: stats.total_score.saturating_add(self.score),
            high_score: stats.high_score.max(self.best_game_score),
            total_knives_thrown: stats.total_knives_thrown.saturating_add(self.knives_thrown),
            successful_hits: stats.successful_hits.saturating_add(self.hits),
            accuracy: stats.accuracy,
            total_apples_hit: stats.total_apples_hit.saturating_add(self.apples_hit),
            max_level_reached: stats.max_level_reached.max(self.highest_level),
            boss_fights_won: stats.boss_fights_won.saturating_add(self.boss_fights_won),
            total_playtime_minutes: stats
                .total_playtime_minutes
                .saturating_add(self.playtime_minutes),
            games_played: stats.games_played.saturating_add(self.games_started),
            knives_unlocked: stats.knives_unlocked.saturating_add(self.knives_unlocked),
        }
        .with_recomputed_accuracy()
    }
}

// ============================================================================
// Tests
// ============================================================================
