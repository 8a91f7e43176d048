//! Progression configuration.
//!
//! Storage location, persisted key names, debounce windows and the knife
//! catalog size. Loaded from and saved to a TOML file.

use knifehit_progression::{AchievementContext, DEFAULT_KNIFE_ASSET};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ConfigResult;

/// Configuration file name.
pub const CONFIG_FILE: &str = "knifehit.toml";

/// Progression configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    // === Storage ===
    /// Directory holding the preference file
    pub data_dir: PathBuf,
    /// Preference file name inside `data_dir`
    pub store_file: String,
    /// Key of the player stats record
    pub stats_key: String,
    /// Key of the game progress record
    pub progress_key: String,

    // === Scheduling ===
    /// Quiet window before an achievement check runs
    pub achievement_check_debounce_ms: u64,
    /// Quiet window before progress is autosaved
    pub autosave_debounce_ms: u64,

    // === Catalog ===
    /// Number of collectible knives, used by "unlock all" achievements
    pub total_knife_assets: u32,
    /// Knife every player owns
    pub default_knife_asset: String,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("save"),
            store_file: "preferences.json".to_string(),
            stats_key: "player_stats".to_string(),
            progress_key: "game_progress".to_string(),
            achievement_check_debounce_ms: 500,
            autosave_debounce_ms: 400,
            total_knife_assets: 12,
            default_knife_asset: DEFAULT_KNIFE_ASSET.to_string(),
        }
    }
}

impl ProgressionConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// A missing or unreadable file is logged and yields the defaults. The
    /// result is validated.
    #[must_use]
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to load config file: {e}");
                Self::default()
            },
        }
    }

    /// Load and validate configuration, reporting failures.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.validate();
        Ok(config)
    }

    /// Save configuration as pretty TOML, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp values to usable ranges.
    pub fn validate(&mut self) {
        self.achievement_check_debounce_ms = self.achievement_check_debounce_ms.max(1);
        self.autosave_debounce_ms = self.autosave_debounce_ms.max(1);
        self.total_knife_assets = self.total_knife_assets.max(1);
        if self.default_knife_asset.is_empty() {
            self.default_knife_asset = DEFAULT_KNIFE_ASSET.to_string();
        }
    }

    /// Full path of the preference file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.store_file)
    }

    /// Evaluation context derived from the catalog size.
    #[must_use]
    pub fn achievement_context(&self) -> AchievementContext {
        AchievementContext::new(self.total_knife_assets)
    }

    /// Achievement check quiet window.
    #[must_use]
    pub fn achievement_check_debounce(&self) -> Duration {
        Duration::from_millis(self.achievement_check_debounce_ms)
    }

    /// Autosave quiet window.
    #[must_use]
    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }
}
