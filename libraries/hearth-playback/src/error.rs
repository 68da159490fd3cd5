//! Error types for playback management

use hearth_core::{HearthError, TrackId};
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The output could not start this track (missing, corrupt, unsupported)
    #[error("Cannot play {track}: {reason}")]
    Unplayable { track: TrackId, reason: String },

    /// Audio output error
    #[error("Audio output error: {0}")]
    Output(String),

    /// Validation, storage or lookup failure from the core layer
    #[error(transparent)]
    Core(#[from] HearthError),
}

impl PlaybackError {
    /// Create an unplayable-track error
    pub fn unplayable(track: &TrackId, reason: impl Into<String>) -> Self {
        Self::Unplayable {
            track: track.clone(),
            reason: reason.into(),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
