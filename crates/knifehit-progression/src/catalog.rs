//! The built-in achievement catalog.
//!
//! Display order is the order of [`CATALOG`].

use crate::achievement::{
    AchievementContext, AchievementDefinition, AchievementRule, AchievementTier, CustomOutcome,
    CustomRule, MetricRule, ProgressDisplay,
};
use crate::stats::{Metric, PlayerStats};

/// Throws required before "Perfect Aim" can unlock.
pub const PERFECT_AIM_MIN_THROWS: u64 = 20;

const fn count(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    tier: AchievementTier,
    metric: Metric,
    target: f64,
) -> AchievementDefinition {
    AchievementDefinition {
        id,
        title,
        description,
        icon: id,
        tier,
        rule: AchievementRule::Metric(MetricRule {
            metric,
            target,
            display: ProgressDisplay::Count,
        }),
    }
}

const fn percent(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    tier: AchievementTier,
    metric: Metric,
    target: f64,
) -> AchievementDefinition {
    AchievementDefinition {
        id,
        title,
        description,
        icon: id,
        tier,
        rule: AchievementRule::Metric(MetricRule {
            metric,
            target,
            display: ProgressDisplay::Percent,
        }),
    }
}

/// Every achievement, in display order.
pub static CATALOG: [AchievementDefinition; 22] = [
    // Basic
    count(
        "first_throw",
        "First Throw",
        "Throw your first knife",
        AchievementTier::Basic,
        Metric::KnivesThrown,
        1.0,
    ),
    count(
        "apple_picker",
        "Apple Picker",
        "Hit 10 apples",
        AchievementTier::Basic,
        Metric::ApplesHit,
        10.0,
    ),
    count(
        "warming_up",
        "Warming Up",
        "Play 5 games",
        AchievementTier::Basic,
        Metric::GamesPlayed,
        5.0,
    ),
    count(
        "level_5",
        "On a Roll",
        "Reach level 5",
        AchievementTier::Basic,
        Metric::MaxLevelReached,
        5.0,
    ),
    count(
        "score_500",
        "Point Maker",
        "Score 500 points in one game",
        AchievementTier::Basic,
        Metric::HighScore,
        500.0,
    ),
    // Intermediate
    count(
        "knife_novice",
        "Knife Novice",
        "Throw 100 knives",
        AchievementTier::Intermediate,
        Metric::KnivesThrown,
        100.0,
    ),
    count(
        "boss_slayer",
        "Boss Slayer",
        "Defeat your first boss",
        AchievementTier::Intermediate,
        Metric::BossFightsWon,
        1.0,
    ),
    count(
        "apple_harvest",
        "Apple Harvest",
        "Hit 100 apples",
        AchievementTier::Intermediate,
        Metric::ApplesHit,
        100.0,
    ),
    count(
        "level_10",
        "Getting Serious",
        "Reach level 10",
        AchievementTier::Intermediate,
        Metric::MaxLevelReached,
        10.0,
    ),
    count(
        "score_hunter",
        "Score Hunter",
        "Earn 10,000 points in total",
        AchievementTier::Intermediate,
        Metric::TotalScore,
        10_000.0,
    ),
    count(
        "collector",
        "Collector",
        "Unlock 5 knives",
        AchievementTier::Intermediate,
        Metric::KnivesUnlocked,
        5.0,
    ),
    // Advanced
    percent(
        "steady_hand",
        "Steady Hand",
        "Keep a lifetime accuracy of 80%",
        AchievementTier::Advanced,
        Metric::Accuracy,
        80.0,
    ),
    AchievementDefinition {
        id: "perfect_aim",
        title: "Perfect Aim",
        description: "Throw at least 20 knives without a single miss",
        icon: "perfect_aim",
        tier: AchievementTier::Advanced,
        rule: AchievementRule::Custom(CustomRule {
            evaluator: perfect_aim,
        }),
    },
    count(
        "knife_master",
        "Knife Master",
        "Throw 1,000 knives",
        AchievementTier::Advanced,
        Metric::KnivesThrown,
        1_000.0,
    ),
    count(
        "boss_hunter",
        "Boss Hunter",
        "Defeat 10 bosses",
        AchievementTier::Advanced,
        Metric::BossFightsWon,
        10.0,
    ),
    count(
        "level_25",
        "Unstoppable",
        "Reach level 25",
        AchievementTier::Advanced,
        Metric::MaxLevelReached,
        25.0,
    ),
    count(
        "dedicated",
        "Dedicated",
        "Play for 60 minutes",
        AchievementTier::Advanced,
        Metric::PlaytimeMinutes,
        60.0,
    ),
    // Extreme
    count(
        "marathon",
        "Marathon",
        "Play 100 games",
        AchievementTier::Extreme,
        Metric::GamesPlayed,
        100.0,
    ),
    count(
        "orchard",
        "Orchard Keeper",
        "Hit 1,000 apples",
        AchievementTier::Extreme,
        Metric::ApplesHit,
        1_000.0,
    ),
    percent(
        "sharpshooter",
        "Sharpshooter",
        "Keep a lifetime accuracy of 95%",
        AchievementTier::Extreme,
        Metric::Accuracy,
        95.0,
    ),
    count(
        "full_arsenal",
        "Full Arsenal",
        "Unlock every knife",
        AchievementTier::Extreme,
        Metric::KnivesUnlocked,
        0.0,
    ),
    count(
        "legend",
        "Legend",
        "Score 10,000 points in one game",
        AchievementTier::Extreme,
        Metric::HighScore,
        10_000.0,
    ),
];

/// The built-in catalog.
#[must_use]
pub fn definitions() -> &'static [AchievementDefinition] {
    &CATALOG
}

/// Look up a definition by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static AchievementDefinition> {
    CATALOG.iter().find(|definition| definition.id == id)
}

/// Definitions of one tier, in catalog order.
pub fn by_tier(tier: AchievementTier) -> impl Iterator<Item = &'static AchievementDefinition> {
    CATALOG.iter().filter(move |definition| definition.tier == tier)
}

/// 100% accuracy over at least [`PERFECT_AIM_MIN_THROWS`] throws.
///
/// Progress is the mean of the accuracy ratio and the throw-count ratio.
fn perfect_aim(stats: &PlayerStats, _context: &AchievementContext) -> CustomOutcome {
    let accuracy = stats.computed_accuracy();
    let thrown = stats.total_knives_thrown;
    let min_throws = PERFECT_AIM_MIN_THROWS as f64;

    let accuracy_ratio = (accuracy / 100.0).clamp(0.0, 1.0);
    let throw_ratio = (thrown as f64 / min_throws).clamp(0.0, 1.0);

    CustomOutcome {
        progress: ((accuracy_ratio + throw_ratio) / 2.0).min(1.0),
        label: format!(
            "{}% / 100% ({}/{} throws)",
            accuracy as i64,
            thrown.min(PERFECT_AIM_MIN_THROWS),
            PERFECT_AIM_MIN_THROWS
        ),
        unlocked: thrown >= PERFECT_AIM_MIN_THROWS && accuracy >= 100.0,
    }
}
