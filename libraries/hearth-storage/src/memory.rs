//! In-memory playlist backend
//!
//! Used by tests and when no database is configured. Ids are allocated from 1
//! and never reused within one backend instance.

use async_trait::async_trait;
use hearth_core::{
    error::{HearthError, Result},
    types::{CreatePlaylist, Playlist, PlaylistId},
    PlaylistBackend,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    playlists: BTreeMap<PlaylistId, Playlist>,
}

/// Playlist backend holding records in a map
#[derive(Debug, Default)]
pub struct MemoryPlaylistBackend {
    state: RwLock<MemoryState>,
}

impl MemoryPlaylistBackend {
    /// Empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with existing records
    pub fn with_playlists(playlists: impl IntoIterator<Item = Playlist>) -> Self {
        let playlists: BTreeMap<PlaylistId, Playlist> =
            playlists.into_iter().map(|p| (p.id, p)).collect();
        let last_id = playlists.keys().map(|id| id.get()).max().unwrap_or(0);

        Self {
            state: RwLock::new(MemoryState { last_id, playlists }),
        }
    }
}

#[async_trait]
impl PlaylistBackend for MemoryPlaylistBackend {
    async fn read_playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self.state.read().await.playlists.values().cloned().collect())
    }

    async fn read_playlist(&self, id: PlaylistId) -> Result<Option<Playlist>> {
        Ok(self.state.read().await.playlists.get(&id).cloned())
    }

    async fn insert_playlist(&self, playlist: CreatePlaylist) -> Result<PlaylistId> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = PlaylistId::new(state.last_id);
        state.playlists.insert(id, Playlist::new(id, playlist.title));
        Ok(id)
    }

    async fn write_playlist(&self, playlist: &Playlist) -> Result<()> {
        let mut state = self.state.write().await;
        let slot = state
            .playlists
            .get_mut(&playlist.id)
            .ok_or(HearthError::PlaylistNotFound(playlist.id))?;
        *slot = playlist.clone();
        Ok(())
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        self.state.write().await.playlists.remove(&id);
        Ok(())
    }
}
