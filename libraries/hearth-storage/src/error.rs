/// Storage-specific errors
use hearth_core::{HearthError, PlaylistId};
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Playlist row does not exist
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for HearthError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::PlaylistNotFound(id) => HearthError::PlaylistNotFound(id),
            StorageError::Database(e) => HearthError::Database(e.to_string()),
            StorageError::Io(e) => HearthError::Io(e),
            other @ StorageError::Migration(_) => HearthError::storage(other.to_string()),
        }
    }
}
