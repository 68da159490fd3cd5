/// Playlist domain types
use super::ids::{PlaylistId, TrackId};
use super::track::Track;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Playlist
///
/// Members are stored by track identity in playback order. A member may
/// reference a track that no longer exists in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist title (display key, not enforced unique)
    pub title: String,

    /// Ordered member tracks (duplicates allowed)
    #[serde(default)]
    pub tracks: Vec<TrackId>,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new(id: PlaylistId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            tracks: Vec::new(),
        }
    }

    /// Append a member
    pub fn push(&mut self, track_id: TrackId) {
        self.tracks.push(track_id);
    }

    /// Remove every occurrence of a member, returning how many were removed
    pub fn remove_all(&mut self, track_id: &TrackId) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|id| id != track_id);
        before - self.tracks.len()
    }

    /// Whether the playlist references the track
    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.tracks.contains(track_id)
    }

    /// Resolve members against the catalog
    ///
    /// Returns the tracks in member order; members missing from the catalog
    /// are skipped.
    pub fn resolve(&self, catalog: &[Track]) -> Vec<Track> {
        let by_id: HashMap<&TrackId, &Track> = catalog.iter().map(|t| (&t.id, t)).collect();
        self.tracks
            .iter()
            .filter_map(|id| by_id.get(id).map(|t| (*t).clone()))
            .collect()
    }
}

/// Data for creating a new playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePlaylist {
    /// Playlist title
    pub title: String,
}

impl CreatePlaylist {
    /// Creation input with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}
