/// Collaborator traits for Hearth Player
use crate::error::{HearthError, Result};
use crate::types::{CreatePlaylist, Playlist, PlaylistId, Track, TrackId};
use async_trait::async_trait;

/// Catalog provider trait
///
/// Implementers hand the player the full list of tracks discovered on the
/// device. Called once per session and again on every refresh request; it may
/// block (folder scanning), so callers run it off the state-update path.
pub trait CatalogProvider: Send + Sync {
    /// List every known track
    ///
    /// # Errors
    /// Returns an error if the underlying source cannot be read
    fn list_tracks(&self) -> Result<Vec<Track>>;

    /// Look up one track by path
    ///
    /// # Errors
    /// Returns [`HearthError::TrackNotFound`] if the catalog has no such track
    fn find_track(&self, id: &TrackId) -> Result<Track> {
        self.list_tracks()?
            .into_iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| HearthError::TrackNotFound(id.clone()))
    }
}

/// Catalog backed by an in-memory list
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tracks: Vec<Track>,
}

impl StaticCatalog {
    /// Wrap an already discovered list of tracks
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }
}

impl CatalogProvider for StaticCatalog {
    fn list_tracks(&self) -> Result<Vec<Track>> {
        Ok(self.tracks.clone())
    }
}

/// Playlist persistence backend
///
/// Implementers store playlist records by id. Only the playlist store writes
/// through this trait.
#[async_trait]
pub trait PlaylistBackend: Send + Sync {
    /// Read every playlist, ordered by id
    async fn read_playlists(&self) -> Result<Vec<Playlist>>;

    /// Read one playlist
    async fn read_playlist(&self, id: PlaylistId) -> Result<Option<Playlist>> {
        Ok(self
            .read_playlists()
            .await?
            .into_iter()
            .find(|p| p.id == id))
    }

    /// Persist a new, empty playlist and return its allocated id
    async fn insert_playlist(&self, playlist: CreatePlaylist) -> Result<PlaylistId>;

    /// Overwrite an existing playlist (title and members)
    ///
    /// # Errors
    /// Returns [`HearthError::PlaylistNotFound`] if the id is unknown
    async fn write_playlist(&self, playlist: &Playlist) -> Result<()>;

    /// Delete a playlist; deleting an unknown id succeeds
    async fn delete_playlist(&self, id: PlaylistId) -> Result<()>;
}

/// Require a playlist to exist
pub fn require_playlist(id: PlaylistId, playlist: Option<Playlist>) -> Result<Playlist> {
    playlist.ok_or(HearthError::PlaylistNotFound(id))
}
