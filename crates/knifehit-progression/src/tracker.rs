//! Session-scoped detection of newly unlocked achievements.

use std::collections::HashSet;

use tracing::debug;

use crate::achievement::{evaluate, AchievementContext, AchievementDefinition};
use crate::catalog;
use crate::stats::PlayerStats;

/// Tracks which achievements were already unlocked when a session began, so
/// only achievements earned during the session are reported as new.
#[derive(Debug, Clone)]
pub struct AchievementTracker {
    catalog: &'static [AchievementDefinition],
    context: AchievementContext,
    known: HashSet<&'static str>,
}

impl AchievementTracker {
    /// Capture the baseline against the built-in catalog.
    #[must_use]
    pub fn initialize(stats: &PlayerStats, context: AchievementContext) -> Self {
        Self::with_catalog(catalog::definitions(), stats, context)
    }

    /// Capture the baseline against a specific catalog.
    #[must_use]
    pub fn with_catalog(
        catalog: &'static [AchievementDefinition],
        stats: &PlayerStats,
        context: AchievementContext,
    ) -> Self {
        let known = unlocked_ids(catalog, stats, &context);
        debug!("Achievement baseline: {} already unlocked", known.len());
        Self {
            catalog,
            context,
            known,
        }
    }

    /// Context used for evaluation.
    #[must_use]
    pub fn context(&self) -> &AchievementContext {
        &self.context
    }

    /// Ids known to be unlocked.
    #[must_use]
    pub fn known_unlocked(&self) -> &HashSet<&'static str> {
        &self.known
    }

    /// Whether `id` is known to be unlocked.
    #[must_use]
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.known.contains(id)
    }

    /// Definitions that became unlocked since the last check, in catalog order.
    ///
    /// Newly found ids are added to the baseline, so repeating a check with the
    /// same stats returns nothing.
    pub fn check_for_new_achievements(
        &mut self,
        stats: &PlayerStats,
    ) -> Vec<&'static AchievementDefinition> {
        let catalog = self.catalog;
        let fresh: Vec<_> = catalog
            .iter()
            .filter(|definition| !self.known.contains(definition.id))
            .filter(|definition| evaluate(definition, stats, &self.context).unlocked)
            .collect();

        for definition in &fresh {
            self.known.insert(definition.id);
        }

        fresh
    }
}

fn unlocked_ids(
    catalog: &'static [AchievementDefinition],
    stats: &PlayerStats,
    context: &AchievementContext,
) -> HashSet<&'static str> {
    catalog
        .iter()
        .filter(|definition| evaluate(definition, stats, context).unlocked)
        .map(|definition| definition.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(defs: &[&AchievementDefinition]) -> Vec<&'static str> {
        defs.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_existing_unlocks_are_not_new() {
        let stats = PlayerStats::baseline().with_throws(5, 5);
        let mut tracker = AchievementTracker::initialize(&stats, AchievementContext::new(12));

        assert!(tracker.is_unlocked("first_throw"));
        assert!(tracker.check_for_new_achievements(&stats).is_empty());
    }

    #[test]
    fn test_new_unlock_reported_once() {
        let start = PlayerStats::baseline();
        let mut tracker = AchievementTracker::initialize(&start, AchievementContext::new(12));

        let later = start.with_throws(1, 0).with_apples_hit(10);
        let first = tracker.check_for_new_achievements(&later);
        assert_eq!(ids(&first), vec!["first_throw", "apple_picker"]);

        let second = tracker.check_for_new_achievements(&later);
        assert!(second.is_empty());
    }

    #[test]
    fn test_baseline_grows_across_checks() {
        let mut tracker =
            AchievementTracker::initialize(&PlayerStats::baseline(), AchievementContext::new(12));

        let step1 = PlayerStats::baseline().with_max_level(5);
        assert_eq!(ids(&tracker.check_for_new_achievements(&step1)), vec!["level_5"]);

        let step2 = step1.clone().with_max_level(10);
        assert_eq!(ids(&tracker.check_for_new_achievements(&step2)), vec!["level_10"]);
        assert!(tracker.is_unlocked("level_5"));
        assert_eq!(tracker.known_unlocked().len(), 2);
    }

    #[test]
    fn test_regression_does_not_relock() {
        let earned = PlayerStats::baseline().with_throws(10, 9);
        let mut tracker =
            AchievementTracker::initialize(&PlayerStats::baseline(), AchievementContext::new(12));
        assert!(ids(&tracker.check_for_new_achievements(&earned)).contains(&"steady_hand"));

        // Accuracy dropping below the threshold keeps the id in the baseline.
        let worse = PlayerStats::baseline().with_throws(20, 9);
        assert!(tracker.check_for_new_achievements(&worse).is_empty());
        assert!(tracker.is_unlocked("steady_hand"));
        assert!(tracker.check_for_new_achievements(&earned).is_empty());
    }
}
