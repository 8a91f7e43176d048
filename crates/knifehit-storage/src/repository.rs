//! Typed access to persisted stats and progress.
//!
//! A malformed payload is never an error here: it is logged and treated as
//! if nothing had been written.

use knifehit_progression::{GameProgress, PlayerStats};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ProgressionConfig;
use crate::error::StorageResult;
use crate::kv::KeyValueStore;

/// Persists [`PlayerStats`] and [`GameProgress`] into a [`KeyValueStore`].
#[derive(Debug)]
pub struct ProgressRepository<S> {
    store: S,
    stats_key: String,
    progress_key: String,
    default_knife: String,
    /// Serializes read-modify-write cycles on the stats record.
    stats_lock: Mutex<()>,
}

impl<S: KeyValueStore> ProgressRepository<S> {
    /// Create a repository using the keys from `config`.
    pub fn new(store: S, config: &ProgressionConfig) -> Self {
        Self {
            store,
            stats_key: config.stats_key.clone(),
            progress_key: config.progress_key.clone(),
            default_knife: config.default_knife_asset.clone(),
            stats_lock: Mutex::new(()),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Knife used to repair progress on read.
    pub fn default_knife(&self) -> &str {
        &self.default_knife
    }

    /// Read stats, falling back to the zero baseline when absent or corrupt.
    pub fn read_player_stats(&self) -> StorageResult<PlayerStats> {
        let stats: Option<PlayerStats> = self.read_record(&self.stats_key)?;
        Ok(stats.unwrap_or_default())
    }

    /// Write stats.
    pub fn write_player_stats(&self, stats: &PlayerStats) -> StorageResult<()> {
        let _guard = self.stats_lock.lock();
        self.write_stats_unlocked(stats)
    }

    /// Read, transform and write stats as one step.
    ///
    /// Accuracy is recomputed before writing. Concurrent callers are
    /// serialized.
    pub fn update_player_stats<F>(&self, update: F) -> StorageResult<PlayerStats>
    where
        F: FnOnce(PlayerStats) -> PlayerStats,
    {
        let _guard = self.stats_lock.lock();
        let current = self.read_player_stats()?;
        let updated = update(current).with_recomputed_accuracy();
        self.write_stats_unlocked(&updated)?;
        Ok(updated)
    }

    /// Replace stats with the zero baseline.
    pub fn reset_player_stats(&self) -> StorageResult<()> {
        self.write_player_stats(&PlayerStats::baseline())
    }

    /// Read progress. `None` when never written or corrupt.
    pub fn read_game_progress(&self) -> StorageResult<Option<GameProgress>> {
        let progress: Option<GameProgress> = self.read_record(&self.progress_key)?;
        Ok(progress.map(|p| p.normalized(&self.default_knife)))
    }

    /// Write progress.
    pub fn write_game_progress(&self, progress: &GameProgress) -> StorageResult<()> {
        self.write_record(&self.progress_key, progress)?;
        debug!(
            "Wrote game progress (level {}, score {})",
            progress.level_index, progress.score
        );
        Ok(())
    }

    /// Delete saved progress.
    pub fn clear_game_progress(&self) -> StorageResult<()> {
        self.store.remove(&self.progress_key)
    }

    fn write_stats_unlocked(&self, stats: &PlayerStats) -> StorageResult<()> {
        let stats = stats.clone().with_recomputed_accuracy();
        self.write_record(&self.stats_key, &stats)?;
        debug!(
            "Wrote player stats ({} games, {} throws)",
            stats.games_played, stats.total_knives_thrown
        );
        Ok(())
    }

    fn read_record<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("Discarding malformed '{key}' payload: {e}");
                Ok(None)
            },
        }
    }

    fn write_record<T: Serialize>(&self, key: &str, record: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(record)?;
        self.store.set(key, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use knifehit_progression::{LevelStateSnapshot, DEFAULT_KNIFE_ASSET};
    use std::sync::Arc;
    use std::thread;

    fn repo() -> ProgressRepository<MemoryStore> {
        ProgressRepository::new(MemoryStore::new(), &ProgressionConfig::default())
    }

    #[test]
    fn test_stats_default_when_absent() {
        let repo = repo();
        assert_eq!(repo.read_player_stats().expect("read"), PlayerStats::baseline());
    }

    #[test]
    fn test_stats_roundtrip_recomputes_accuracy() {
        let repo = repo();
        let mut stats = PlayerStats::baseline().with_throws(4, 3);
        stats.accuracy = 12.0;
        repo.write_player_stats(&stats).expect("write");

        let loaded = repo.read_player_stats().expect("read");
        assert!((loaded.accuracy - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_corrupt_stats_treated_as_baseline() {
        let repo = repo();
        repo.store()
            .set("player_stats", "{\"totalScore\": \"many\"}".to_string())
            .expect("set");
        assert_eq!(repo.read_player_stats().expect("read"), PlayerStats::baseline());

        repo.store()
            .set("game_progress", "[1, 2, 3".to_string())
            .expect("set");
        assert_eq!(repo.read_game_progress().expect("read"), None);
    }

    #[test]
    fn test_float_encoded_stats_decode() {
        let repo = repo();
        repo.store()
            .set(
                "player_stats",
                r#"{"gamesPlayed": 3.0, "highScore": 420.0}"#.to_string(),
            )
            .expect("set");
        let stats = repo.read_player_stats().expect("read");
        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.high_score, 420);
    }

    #[test]
    fn test_update_player_stats() {
        let repo = repo();
        let updated = repo
            .update_player_stats(|s| {
                let games = s.games_played + 1;
                s.with_games_played(games)
            })
            .expect("update");
        assert_eq!(updated.games_played, 1);
        assert_eq!(repo.read_player_stats().expect("read").games_played, 1);

        repo.reset_player_stats().expect("reset");
        assert_eq!(repo.read_player_stats().expect("read").games_played, 0);
    }

    #[test]
    fn test_concurrent_updates_are_serialized() {
        let repo = Arc::new(repo());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    for _ in 0..25 {
                        repo.update_player_stats(|s| {
                            let games = s.games_played + 1;
                            s.with_games_played(games)
                        })
                        .expect("update");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }
        assert_eq!(repo.read_player_stats().expect("read").games_played, 200);
    }

    #[test]
    fn test_progress_roundtrip_and_clear() {
        let repo = repo();
        assert_eq!(repo.read_game_progress().expect("read"), None);

        let progress = GameProgress::baseline(DEFAULT_KNIFE_ASSET)
            .with_active_level(LevelStateSnapshot::new(1).with_remaining_knives(6));
        repo.write_game_progress(&progress).expect("write");
        assert_eq!(repo.read_game_progress().expect("read"), Some(progress));

        repo.clear_game_progress().expect("clear");
        assert_eq!(repo.read_game_progress().expect("read"), None);
    }

    #[test]
    fn test_progress_normalized_on_read() {
        let repo = repo();
        repo.store()
            .set(
                "game_progress",
                r#"{"levelIndex": 0, "equippedKnifeAsset": "knife_lost", "unlockedKnifeAssets": []}"#
                    .to_string(),
            )
            .expect("set");
        let progress = repo.read_game_progress().expect("read").expect("present");
        assert_eq!(progress.level_index, 1);
        assert_eq!(progress.equipped_knife_asset, DEFAULT_KNIFE_ASSET);
        assert!(progress.unlocked_knife_assets.contains(DEFAULT_KNIFE_ASSET));
    }
}
