//! Choosing which progress snapshot to resume from.

use crate::progress::GameProgress;

/// Which candidate [`resolve_for_continue`] picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueSource {
    /// The in-memory copy.
    Cached,
    /// The copy read from storage.
    Stored,
}

/// Decide which candidate represents further advancement.
///
/// Comparison uses [`GameProgress::effective_level`]. `cached` wins only when
/// it is strictly further along, or on a tie when it alone carries an
/// in-level snapshot. Every other case returns `stored`. Score is not
/// compared.
#[must_use]
pub fn choose_source(cached: &GameProgress, stored: &GameProgress) -> ContinueSource {
    let cached_level = cached.effective_level();
    let stored_level = stored.effective_level();

    if cached_level > stored_level {
        return ContinueSource::Cached;
    }
    if cached_level == stored_level && cached.has_active_level() && !stored.has_active_level() {
        return ContinueSource::Cached;
    }
    ContinueSource::Stored
}

/// Pick the snapshot to resume from.
///
/// A missing candidate yields the other one; see [`choose_source`] for the
/// rule when both exist.
#[must_use]
pub fn resolve_for_continue(
    cached: Option<GameProgress>,
    stored: Option<GameProgress>,
) -> Option<GameProgress> {
    match (cached, stored) {
        (None, stored) => stored,
        (cached, None) => cached,
        (Some(cached), Some(stored)) => match choose_source(&cached, &stored) {
            ContinueSource::Cached => Some(cached),
            ContinueSource::Stored => Some(stored),
        },
    }
}
