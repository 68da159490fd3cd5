//! Play history tracking
//!
//! Records the tracks selected during the current shuffle cycle. Serves both
//! "previous" navigation (stack order) and shuffle no-repeat (set membership).

use hearth_core::Track;
use std::collections::HashSet;

/// Play history bounded by the display-list size
///
/// A track appears at most once. When the history has grown to the size of
/// the display list, the next recorded selection clears it first, which starts
/// a new shuffle cycle.
#[derive(Debug, Clone, Default)]
pub struct PlayHistory {
    /// History buffer (most recent = back)
    tracks: Vec<Track>,
}

impl PlayHistory {
    /// Create empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection made from `display`
    ///
    /// Entries that left the display list are dropped first, and a track that
    /// is not in the display list is not recorded. Returns `true` when the
    /// history was cleared to start a new cycle.
    pub fn record(&mut self, track: &Track, display: &[Track]) -> bool {
        let visible: HashSet<&Track> = display.iter().collect();
        if !visible.contains(track) {
            return false;
        }
        self.tracks.retain(|t| visible.contains(t));

        let restarted = self.tracks.len() >= display.len();
        if restarted {
            self.tracks.clear();
        }

        if !self.contains(track) {
            self.tracks.push(track.clone());
        }

        restarted
    }

    /// Step back
    ///
    /// Drops the most recent entry (the current track) and returns the one
    /// below it, which stays in place as the new top. Needs at least two
    /// entries; otherwise nothing changes and `None` is returned.
    pub fn step_back(&mut self) -> Option<Track> {
        if self.tracks.len() < 2 {
            return None;
        }
        self.tracks.pop();
        self.tracks.last().cloned()
    }

    /// Get most recent track (without removing)
    pub fn peek(&self) -> Option<&Track> {
        self.tracks.last()
    }

    /// Whether the track was already played in this cycle
    pub fn contains(&self, track: &Track) -> bool {
        self.tracks.contains(track)
    }

    /// Whether every track of `tracks` is already in the history
    pub fn covers(&self, tracks: &[Track]) -> bool {
        tracks.iter().all(|t| self.contains(t))
    }

    /// Forget a track (after it was deleted)
    pub fn remove(&mut self, track: &Track) {
        self.tracks.retain(|t| t != track);
    }

    /// Get all history tracks (oldest first)
    pub fn get_all(&self) -> &[Track] {
        &self.tracks
    }

    /// Get number of tracks in history
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}
