/// `SQLite` implementation of the playlist backend
use crate::playlists;
use async_trait::async_trait;
use hearth_core::{
    error::Result,
    types::{CreatePlaylist, Playlist, PlaylistId},
    PlaylistBackend,
};
use sqlx::SqlitePool;

/// Playlist backend over a `SQLite` pool
#[derive(Debug, Clone)]
pub struct SqlitePlaylistBackend {
    pool: SqlitePool,
}

impl SqlitePlaylistBackend {
    /// Wrap a pool; migrations must already have run
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PlaylistBackend for SqlitePlaylistBackend {
    async fn read_playlists(&self) -> Result<Vec<Playlist>> {
        Ok(playlists::get_all(&self.pool).await?)
    }

    async fn read_playlist(&self, id: PlaylistId) -> Result<Option<Playlist>> {
        Ok(playlists::get_by_id(&self.pool, id).await?)
    }

    async fn insert_playlist(&self, playlist: CreatePlaylist) -> Result<PlaylistId> {
        Ok(playlists::create(&self.pool, playlist).await?)
    }

    async fn write_playlist(&self, playlist: &Playlist) -> Result<()> {
        Ok(playlists::update(&self.pool, playlist).await?)
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        Ok(playlists::delete(&self.pool, id).await?)
    }
}
