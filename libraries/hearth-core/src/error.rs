/// Core error types for Hearth Player
use crate::types::{PlaylistId, TrackId};
use thiserror::Error;

/// Result type alias using `HearthError`
pub type Result<T> = std::result::Result<T, HearthError>;

/// Core error type for Hearth Player
#[derive(Error, Debug)]
pub enum HearthError {
    /// Rejected input (empty playlist title, zero-length timer, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Playlist not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl HearthError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether this error means the requested entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PlaylistNotFound(_) | Self::TrackNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_are_classified() {
        assert!(HearthError::PlaylistNotFound(PlaylistId::new(3)).is_not_found());
        assert!(HearthError::TrackNotFound(TrackId::new("/a.mp3")).is_not_found());
        assert!(!HearthError::validation("empty").is_not_found());
    }

    #[test]
    fn messages_name_the_entity() {
        let err = HearthError::PlaylistNotFound(PlaylistId::new(999));
        assert_eq!(err.to_string(), "Playlist not found: 999");

        let err = HearthError::validation("Playlist title cannot be empty");
        assert_eq!(
            err.to_string(),
            "Validation error: Playlist title cannot be empty"
        );
    }
}
