//! # Knifehit Inspect
//!
//! Prints the achievement board and resumable progress stored in a Knifehit
//! preference file.
//!
//! Usage: `knifehit-inspect [config-path]` (defaults to `knifehit.toml`).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use knifehit_progression::{
    definitions, evaluate_all, AchievementProgress, AchievementSummary, GameProgress,
};
use knifehit_storage::{FileStore, ProgressRepository, ProgressionConfig, CONFIG_FILE};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("knifehit=info".parse()?))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let config = ProgressionConfig::load_from(&config_path);

    let store_path = config.store_path();
    info!("Reading {}", store_path.display());
    let store = FileStore::open(&store_path)
        .with_context(|| format!("failed to open {}", store_path.display()))?;
    let repo = ProgressRepository::new(store, &config);

    let stats = repo.read_player_stats()?;
    let results = evaluate_all(definitions(), &stats, &config.achievement_context());
    for result in &results {
        println!("{}", achievement_line(result));
    }

    let summary = AchievementSummary::from_progress(&results);
    println!();
    println!(
        "{}/{} achievements unlocked ({:.0}%)",
        summary.unlocked,
        summary.total,
        summary.completion_percent()
    );

    println!();
    match repo.read_game_progress()? {
        Some(progress) => println!("{}", progress_line(&progress)),
        None => println!("No saved progress"),
    }

    Ok(())
}

fn achievement_line(result: &AchievementProgress<'_>) -> String {
    let mark = if result.unlocked { 'x' } else { ' ' };
    format!("[{mark}] {}  {}", result.definition.title, result.label)
}

fn progress_line(progress: &GameProgress) -> String {
    let mut line = format!(
        "Level {}, score {}, {} coins, knife {}",
        progress.effective_level(),
        progress.score,
        progress.apple_coins,
        progress.equipped_knife_asset
    );
    if let Some(snapshot) = &progress.active_level {
        line.push_str(&format!(
            " (mid-level, {} knives left)",
            snapshot.remaining_knives
        ));
    }
    line
}
