/// ID types for Hearth Player entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
///
/// The stable path or URI of the audio file. Two tracks with the same title are
/// still distinct tracks when their paths differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent folder of the path/URI (empty when there is none)
    pub fn folder(&self) -> &str {
        match self.0.rfind(['/', '\\']) {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Playlist identifier, assigned by the persistence backend at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(i64);

impl PlaylistId {
    /// Create a playlist ID from its numeric value
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Numeric value (database row id)
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
