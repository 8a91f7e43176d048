//! Resumable game progress.
//!
//! This module provides:
//! - `GameProgress`: the single persisted snapshot of where the player is
//! - `LevelStateSnapshot`: exact in-level state captured when quitting mid-level
//! - New-game baseline construction (partial carry-over)

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

use crate::error::{ProgressError, ProgressResult};
use crate::lenient;

/// Knife every player owns from the first launch.
pub const DEFAULT_KNIFE_ASSET: &str = "knife_default";

/// First level index.
pub const FIRST_LEVEL: u32 = 1;

// ============================================================================
// Level State Snapshot
// ============================================================================

/// Speed-up state of a boss target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BossRampState {
    /// Seconds since the ramp started.
    #[serde(deserialize_with = "lenient::as_f64")]
    pub elapsed_seconds: f64,
    /// Current multiplier applied to the base rotation speed.
    #[serde(deserialize_with = "lenient::as_f64")]
    pub speed_multiplier: f64,
}

/// Exact state of a level in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelStateSnapshot {
    /// Level being played.
    #[serde(deserialize_with = "lenient::as_u32")]
    pub level_index: u32,
    /// Target rotation in degrees.
    #[serde(deserialize_with = "lenient::as_f64")]
    pub target_angle: f64,
    /// Target rotation speed in degrees per second.
    #[serde(deserialize_with = "lenient::as_f64")]
    pub target_speed: f64,
    /// Angles of apples still on the target.
    #[serde(deserialize_with = "lenient::as_f64_list")]
    pub stuck_apples: Vec<f64>,
    /// Angles of knives already stuck in the target.
    #[serde(deserialize_with = "lenient::as_f64_list")]
    pub stuck_knives: Vec<f64>,
    /// Knives left to throw.
    #[serde(deserialize_with = "lenient::as_u32")]
    pub remaining_knives: u32,
    /// Boss ramp, for boss levels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boss_ramp: Option<BossRampState>,
}

impl Default for LevelStateSnapshot {
    fn default() -> Self {
        Self::new(FIRST_LEVEL)
    }
}

impl LevelStateSnapshot {
    /// Create an empty snapshot for a level.
    #[must_use]
    pub fn new(level_index: u32) -> Self {
        Self {
            level_index,
            target_angle: 0.0,
            target_speed: 0.0,
            stuck_apples: Vec::new(),
            stuck_knives: Vec::new(),
            remaining_knives: 0,
            boss_ramp: None,
        }
    }

    /// Set target rotation.
    #[must_use]
    pub fn with_target(mut self, angle: f64, speed: f64) -> Self {
        self.target_angle = angle;
        self.target_speed = speed;
        self
    }

    /// Set remaining knives.
    #[must_use]
    pub fn with_remaining_knives(mut self, knives: u32) -> Self {
        self.remaining_knives = knives;
        self
    }

    /// Set boss ramp.
    #[must_use]
    pub fn with_boss_ramp(mut self, ramp: BossRampState) -> Self {
        self.boss_ramp = Some(ramp);
        self
    }

    /// Record a knife stuck at `angle`.
    pub fn stick_knife(&mut self, angle: f64) {
        self.stuck_knives.push(angle);
        self.remaining_knives = self.remaining_knives.saturating_sub(1);
    }

    /// Whether this is a boss level snapshot.
    #[must_use]
    pub fn is_boss(&self) -> bool {
        self.boss_ramp.is_some()
    }
}

// ============================================================================
// Game Progress
// ============================================================================

/// Snapshot of resumable play state.
///
/// The default knife is always a member of `unlocked_knife_assets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameProgress {
    /// Current level (1-based).
    #[serde(deserialize_with = "lenient::as_u32")]
    pub level_index: u32,
    /// Score of the current game.
    #[serde(deserialize_with = "lenient::as_u64")]
    pub score: u64,
    /// Soft currency balance.
    #[serde(deserialize_with = "lenient::as_u64")]
    pub apple_coins: u64,
    /// Equipped knife skin.
    pub equipped_knife_asset: String,
    /// Unlocked knife skins.
    pub unlocked_knife_assets: BTreeSet<String>,
    /// Boss levels already beaten in this game.
    #[serde(deserialize_with = "lenient::as_u32_set")]
    pub defeated_boss_levels: BTreeSet<u32>,
    /// In-level state, when the player quit mid-level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_level: Option<LevelStateSnapshot>,
}

impl Default for GameProgress {
    fn default() -> Self {
        Self::baseline(DEFAULT_KNIFE_ASSET)
    }
}

impl GameProgress {
    /// First-launch progress.
    #[must_use]
    pub fn baseline(default_knife: &str) -> Self {
        Self {
            level_index: FIRST_LEVEL,
            score: 0,
            apple_coins: 0,
            equipped_knife_asset: default_knife.to_string(),
            unlocked_knife_assets: BTreeSet::from([default_knife.to_string()]),
            defeated_boss_levels: BTreeSet::new(),
            active_level: None,
        }
    }

    /// Progress for a new game.
    ///
    /// Coins and knives carry over from `previous`; level, score, defeated
    /// bosses and any in-level snapshot are reset.
    #[must_use]
    pub fn new_game_from(previous: Option<&Self>, default_knife: &str) -> Self {
        match previous {
            Some(previous) => Self {
                level_index: FIRST_LEVEL,
                score: 0,
                apple_coins: previous.apple_coins,
                equipped_knife_asset: previous.equipped_knife_asset.clone(),
                unlocked_knife_assets: previous.unlocked_knife_assets.clone(),
                defeated_boss_levels: BTreeSet::new(),
                active_level: None,
            }
            .normalized(default_knife),
            None => Self::baseline(default_knife),
        }
    }

    /// Repair invariants after decoding.
    #[must_use]
    pub fn normalized(mut self, default_knife: &str) -> Self {
        if self.level_index < FIRST_LEVEL {
            warn!("Stored level {} is out of range, resetting to {FIRST_LEVEL}", self.level_index);
            self.level_index = FIRST_LEVEL;
        }
        self.unlocked_knife_assets.insert(default_knife.to_string());
        if !self.unlocked_knife_assets.contains(&self.equipped_knife_asset) {
            warn!(
                "Equipped knife '{}' is not unlocked, falling back to '{default_knife}'",
                self.equipped_knife_asset
            );
            self.equipped_knife_asset = default_knife.to_string();
        }
        self
    }

    /// Level used to compare advancement: the in-level snapshot's level when
    /// present, otherwise `level_index`.
    #[must_use]
    pub fn effective_level(&self) -> u32 {
        self.active_level
            .as_ref()
            .map_or(self.level_index, |snapshot| snapshot.level_index)
    }

    /// Whether an in-level snapshot is present.
    #[must_use]
    pub fn has_active_level(&self) -> bool {
        self.active_level.is_some()
    }

    /// Attach an in-level snapshot.
    #[must_use]
    pub fn with_active_level(mut self, snapshot: LevelStateSnapshot) -> Self {
        self.active_level = Some(snapshot);
        self
    }

    /// Drop the in-level snapshot.
    pub fn clear_active_level(&mut self) {
        self.active_level = None;
    }

    /// Jump to a level.
    pub fn set_level(&mut self, level: u32) -> ProgressResult<()> {
        if level < FIRST_LEVEL {
            return Err(ProgressError::InvalidLevel(level));
        }
        self.level_index = level;
        Ok(())
    }

    /// Move to the next level; the in-level snapshot no longer applies.
    pub fn advance_level(&mut self) {
        self.level_index = self.level_index.saturating_add(1);
        self.active_level = None;
    }

    /// Add points to the current game.
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Add coins.
    pub fn earn_coins(&mut self, amount: u64) {
        self.apple_coins = self.apple_coins.saturating_add(amount);
    }

    /// Spend coins.
    pub fn spend_coins(&mut self, amount: u64) -> ProgressResult<()> {
        if amount > self.apple_coins {
            return Err(ProgressError::InsufficientCoins {
                needed: amount,
                available: self.apple_coins,
            });
        }
        self.apple_coins -= amount;
        Ok(())
    }

    /// Unlock a knife. Returns true if it was not unlocked before.
    pub fn unlock_knife(&mut self, knife: impl Into<String>) -> bool {
        self.unlocked_knife_assets.insert(knife.into())
    }

    /// Equip an unlocked knife.
    pub fn equip_knife(&mut self, knife: &str) -> ProgressResult<()> {
        if !self.unlocked_knife_assets.contains(knife) {
            return Err(ProgressError::KnifeLocked(knife.to_string()));
        }
        self.equipped_knife_asset = knife.to_string();
        Ok(())
    }

    /// Record a beaten boss level. Returns true if it was not recorded before.
    pub fn record_boss_defeat(&mut self, level: u32) -> bool {
        self.defeated_boss_levels.insert(level)
    }

    /// Whether a boss level has been beaten.
    #[must_use]
    pub fn is_boss_defeated(&self, level: u32) -> bool {
        self.defeated_boss_levels.contains(&level)
    }
}

// ============================================================================
// Tests
// ============================================================================
