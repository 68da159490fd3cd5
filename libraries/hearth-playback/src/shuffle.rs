//! Shuffle selection
//!
//! Picks the next track without replaying anything from the current cycle.
//! The cycle is the play history: once every display track has been played,
//! the history is cleared and a new cycle begins.

use crate::history::PlayHistory;
use hearth_core::Track;
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick the next shuffled track
///
/// - A single-track list returns that track.
/// - When the history already covers the display list (or leaves no
///   candidate), the history is cleared before picking.
/// - Candidates are display tracks not in the history; the current track is
///   avoided whenever another candidate exists.
///
/// Returns `None` only for an empty display list.
pub fn pick_next<R: Rng + ?Sized>(
    display: &[Track],
    history: &mut PlayHistory,
    current: Option<&Track>,
    rng: &mut R,
) -> Option<Track> {
    match display {
        [] => return None,
        [only] => return Some(only.clone()),
        _ => {}
    }

    let mut candidates: Vec<&Track> = display.iter().filter(|t| !history.contains(t)).collect();

    if candidates.is_empty() {
        tracing::debug!("Shuffle cycle complete after {} tracks", history.len());
        history.clear();
        candidates = display.iter().collect();
    }

    if candidates.len() > 1 {
        if let Some(current) = current {
            candidates.retain(|t| *t != current);
        }
    }

    candidates.choose(rng).map(|t| (*t).clone())
}
