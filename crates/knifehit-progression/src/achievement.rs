//! Achievement rules and their evaluation.
//!
//! An [`AchievementDefinition`] is a static, declarative rule. Evaluating it
//! against a [`PlayerStats`] snapshot produces an [`AchievementProgress`]:
//! a ratio in `[0, 1]`, a display label, and an unlocked flag. Evaluation is
//! pure and retains nothing between calls.

use crate::stats::{Metric, PlayerStats};

// ============================================================================
// Definitions
// ============================================================================

/// Display grouping for achievements. Not used by evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AchievementTier {
    /// Early, easy goals.
    Basic,
    /// Goals for regular players.
    Intermediate,
    /// Goals for skilled players.
    Advanced,
    /// Long-haul goals.
    Extreme,
}

impl AchievementTier {
    /// Get display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Extreme => "Extreme",
        }
    }
}

/// How a metric rule renders its progress label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressDisplay {
    /// `"current/target"`
    Count,
    /// `"current% / target%"`
    Percent,
}

/// Threshold on a single metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRule {
    /// Metric to read.
    pub metric: Metric,
    /// Value to reach. For [`Metric::KnivesUnlocked`], `0` means "every knife".
    pub target: f64,
    /// Label format.
    pub display: ProgressDisplay,
}

/// Result of a custom evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomOutcome {
    /// Progress ratio, expected in `[0, 1]`.
    pub progress: f64,
    /// Display label.
    pub label: String,
    /// Whether the achievement is earned.
    pub unlocked: bool,
}

/// Signature of a custom evaluator.
pub type CustomEvaluator = fn(&PlayerStats, &AchievementContext) -> CustomOutcome;

/// Rule that combines several stats dimensions.
#[derive(Clone, Copy)]
pub struct CustomRule {
    /// Computes progress, label and unlock state.
    pub evaluator: CustomEvaluator,
}

impl std::fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRule").finish_non_exhaustive()
    }
}

/// Evaluation strategy of a definition.
#[derive(Debug, Clone, Copy)]
pub enum AchievementRule {
    /// Threshold on one metric.
    Metric(MetricRule),
    /// Arbitrary combination of stats.
    Custom(CustomRule),
}

/// A single achievement in the catalog.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDefinition {
    /// Stable identifier.
    pub id: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Display description.
    pub description: &'static str,
    /// Icon asset reference.
    pub icon: &'static str,
    /// Display tier.
    pub tier: AchievementTier,
    /// Evaluation strategy.
    pub rule: AchievementRule,
}

impl AchievementDefinition {
    /// Evaluate this definition. See [`evaluate`].
    #[must_use]
    pub fn evaluate(
        &self,
        stats: &PlayerStats,
        context: &AchievementContext,
    ) -> AchievementProgress<'_> {
        evaluate(self, stats, context)
    }
}

/// Values needed to resolve targets that are not stored in [`PlayerStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AchievementContext {
    /// Number of collectible knives in the game.
    pub total_collectibles: u32,
}

impl AchievementContext {
    /// Create a context.
    #[must_use]
    pub const fn new(total_collectibles: u32) -> Self {
        Self { total_collectibles }
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluation result for one definition.
#[derive(Debug, Clone)]
pub struct AchievementProgress<'a> {
    /// The evaluated definition.
    pub definition: &'a AchievementDefinition,
    /// Progress ratio in `[0, 1]`.
    pub progress: f64,
    /// Display label.
    pub label: String,
    /// Whether the achievement is earned.
    pub unlocked: bool,
}

impl AchievementProgress<'_> {
    /// Progress as a percentage.
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.progress * 100.0
    }
}

/// Evaluate one definition against a stats snapshot.
#[must_use]
pub fn evaluate<'a>(
    definition: &'a AchievementDefinition,
    stats: &PlayerStats,
    context: &AchievementContext,
) -> AchievementProgress<'a> {
    match definition.rule {
        AchievementRule::Custom(rule) => {
            let outcome = (rule.evaluator)(stats, context);
            AchievementProgress {
                definition,
                progress: outcome.progress.clamp(0.0, 1.0),
                label: outcome.label,
                unlocked: outcome.unlocked,
            }
        },
        AchievementRule::Metric(rule) => {
            let (progress, label, unlocked) = evaluate_metric(&rule, stats, context);
            AchievementProgress {
                definition,
                progress,
                label,
                unlocked,
            }
        },
    }
}

/// Evaluate every definition, preserving catalog order.
#[must_use]
pub fn evaluate_all<'a>(
    definitions: &'a [AchievementDefinition],
    stats: &PlayerStats,
    context: &AchievementContext,
) -> Vec<AchievementProgress<'a>> {
    definitions
        .iter()
        .map(|definition| evaluate(definition, stats, context))
        .collect()
}

/// Resolve the effective target of a metric rule.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn resolve_target(rule: &MetricRule, context: &AchievementContext) -> f64 {
    if rule.metric == Metric::KnivesUnlocked && rule.target == 0.0 {
        f64::from(context.total_collectibles)
    } else {
        rule.target
    }
}

fn evaluate_metric(
    rule: &MetricRule,
    stats: &PlayerStats,
    context: &AchievementContext,
) -> (f64, String, bool) {
    let target = resolve_target(rule, context);
    let current = rule.metric.read(stats);

    let (progress, unlocked) = if target <= 0.0 {
        if current > 0.0 {
            (1.0, true)
        } else {
            (0.0, false)
        }
    } else {
        ((current / target).clamp(0.0, 1.0), current >= target)
    };

    let label = match rule.display {
        ProgressDisplay::Count => {
            let target = target.round();
            format!("{}/{}", current.round().min(target) as i64, target as i64)
        },
        ProgressDisplay::Percent => {
            format!("{}% / {}%", current.min(target) as i64, target as i64)
        },
    };

    (progress, label, unlocked)
}

// ============================================================================
// Summary
// ============================================================================

/// Aggregate view over an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementSummary {
    /// Unlocked definitions.
    pub unlocked: usize,
    /// All definitions.
    pub total: usize,
}

impl AchievementSummary {
    /// Summarize an evaluation.
    #[must_use]
    pub fn from_progress(progress: &[AchievementProgress<'_>]) -> Self {
        Self {
            unlocked: progress.iter().filter(|p| p.unlocked).count(),
            total: progress.len(),
        }
    }

    /// Completion percentage. Zero for an empty catalog.
    #[must_use]
    pub fn completion_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.unlocked as f64 / self.total as f64 * 100.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const fn metric_def(
        metric: Metric,
        target: f64,
        display: ProgressDisplay,
    ) -> AchievementDefinition {
        AchievementDefinition {
            id: "probe",
            title: "Probe",
            description: "Probe",
            icon: "probe",
            tier: AchievementTier::Basic,
            rule: AchievementRule::Metric(MetricRule {
                metric,
                target,
                display,
            }),
        }
    }

    fn overshooting_outcome(_: &PlayerStats, _: &AchievementContext) -> CustomOutcome {
        CustomOutcome {
            progress: 1.7,
            label: "custom".to_string(),
            unlocked: false,
        }
    }

    #[test]
    fn test_count_label_and_ratio() {
        let def = metric_def(Metric::ApplesHit, 10.0, ProgressDisplay::Count);
        let ctx = AchievementContext::default();

        let p = evaluate(&def, &PlayerStats::baseline().with_apples_hit(7), &ctx);
        assert_eq!(p.label, "7/10");
        assert!((p.progress - 0.7).abs() < 1e-9);
        assert!(!p.unlocked);

        let p = evaluate(&def, &PlayerStats::baseline().with_apples_hit(15), &ctx);
        assert_eq!(p.label, "10/10");
        assert_eq!(p.progress, 1.0);
        assert!(p.unlocked);
    }

    #[test]
    fn test_percent_label() {
        let def = metric_def(Metric::Accuracy, 80.0, ProgressDisplay::Percent);
        let ctx = AchievementContext::default();

        let p = evaluate(&def, &PlayerStats::baseline().with_throws(3, 2), &ctx);
        assert_eq!(p.label, "66% / 80%");
        assert!(!p.unlocked);

        let p = evaluate(&def, &PlayerStats::baseline().with_throws(10, 9), &ctx);
        assert_eq!(p.label, "80% / 80%");
        assert!(p.unlocked);
    }

    #[test]
    fn test_zero_target_resolves_to_collectible_count() {
        let def = metric_def(Metric::KnivesUnlocked, 0.0, ProgressDisplay::Count);
        let ctx = AchievementContext::new(12);

        let p = evaluate(&def, &PlayerStats::baseline().with_knives_unlocked(6), &ctx);
        assert_eq!(p.label, "6/12");
        assert!((p.progress - 0.5).abs() < 1e-9);
        assert!(!p.unlocked);

        let p = evaluate(&def, &PlayerStats::baseline().with_knives_unlocked(12), &ctx);
        assert!(p.unlocked);
    }

    #[test]
    fn test_zero_target_is_binary() {
        let ctx = AchievementContext::new(0);
        let def = metric_def(Metric::KnivesUnlocked, 0.0, ProgressDisplay::Count);

        let p = evaluate(&def, &PlayerStats::baseline(), &ctx);
        assert_eq!(p.progress, 0.0);
        assert!(!p.unlocked);

        let p = evaluate(&def, &PlayerStats::baseline().with_knives_unlocked(1), &ctx);
        assert_eq!(p.progress, 1.0);
        assert!(p.unlocked);

        let def = metric_def(Metric::GamesPlayed, 0.0, ProgressDisplay::Count);
        let p = evaluate(&def, &PlayerStats::baseline().with_games_played(3), &ctx);
        assert!(p.unlocked);
    }

    #[test]
    fn test_custom_rule_is_delegated_and_clamped() {
        let def = AchievementDefinition {
            rule: AchievementRule::Custom(CustomRule {
                evaluator: overshooting_outcome,
            }),
            ..metric_def(Metric::GamesPlayed, 1.0, ProgressDisplay::Count)
        };
        let p = evaluate(&def, &PlayerStats::baseline(), &AchievementContext::default());
        assert_eq!(p.label, "custom");
        assert_eq!(p.progress, 1.0);
        assert!(!p.unlocked);
    }

    #[test]
    fn test_evaluate_all_preserves_order() {
        let defs = [
            AchievementDefinition {
                id: "b",
                ..metric_def(Metric::GamesPlayed, 1.0, ProgressDisplay::Count)
            },
            AchievementDefinition {
                id: "a",
                ..metric_def(Metric::GamesPlayed, 5.0, ProgressDisplay::Count)
            },
        ];
        let stats = PlayerStats::baseline().with_games_played(2);
        let results = evaluate_all(&defs, &stats, &AchievementContext::default());

        let ids: Vec<_> = results.iter().map(|p| p.definition.id).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let summary = AchievementSummary::from_progress(&results);
        assert_eq!(summary.unlocked, 1);
        assert_eq!(summary.total, 2);
        assert!((summary.completion_percent() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = AchievementSummary::from_progress(&[]);
        assert_eq!(summary.completion_percent(), 0.0);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(AchievementTier::Basic.display_name(), "Basic");
        assert_eq!(AchievementTier::Extreme.display_name(), "Extreme");
    }

    proptest! {
        #[test]
        fn prop_ratio_clamped(current in 0u64..10_000, target in 0u32..5_000) {
            let def = metric_def(Metric::ApplesHit, f64::from(target), ProgressDisplay::Count);
            let stats = PlayerStats::baseline().with_apples_hit(current);
            let p = evaluate(&def, &stats, &AchievementContext::default());
            prop_assert!((0.0..=1.0).contains(&p.progress));
            if target > 0 {
                prop_assert_eq!(p.unlocked, current >= u64::from(target));
            } else {
                prop_assert_eq!(p.unlocked, current > 0);
            }
        }

        #[test]
        fn prop_count_label_never_exceeds_target(current in 0u64..10_000, target in 1u32..5_000) {
            let def = metric_def(Metric::ApplesHit, f64::from(target), ProgressDisplay::Count);
            let stats = PlayerStats::baseline().with_apples_hit(current);
            let p = evaluate(&def, &stats, &AchievementContext::default());
            let shown = current.min(u64::from(target));
            prop_assert_eq!(p.label, format!("{shown}/{target}"));
        }
    }
}
