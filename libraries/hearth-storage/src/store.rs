//! Observable playlist store
//!
//! The store is the only writer of persisted playlists. Mutations are
//! serialized on one async lock; each one writes through the backend, then
//! re-reads the full list and republishes it, so a subscriber never observes a
//! snapshot older than a completed write.
//!
//! When the backend fails, the error is returned and the published list keeps
//! reflecting the last successful write.

use hearth_core::{
    error::{HearthError, Result},
    traits::require_playlist,
    types::{CreatePlaylist, Playlist, PlaylistId, TrackId},
    PlaylistBackend,
};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Shared, immutable snapshot of every playlist
pub type PlaylistSnapshot = Arc<Vec<Playlist>>;

/// Playlist store over a persistence backend
pub struct PlaylistStore {
    backend: Arc<dyn PlaylistBackend>,
    published: watch::Sender<PlaylistSnapshot>,
    write_lock: Mutex<()>,
}

impl PlaylistStore {
    /// Create a store with an empty published list
    ///
    /// Call [`PlaylistStore::refresh`] (or use [`PlaylistStore::load`]) to
    /// publish what the backend already holds.
    pub fn new(backend: Arc<dyn PlaylistBackend>) -> Self {
        let (published, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            backend,
            published,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store and publish the backend's current playlists
    pub async fn load(backend: Arc<dyn PlaylistBackend>) -> Result<Self> {
        let store = Self::new(backend);
        store.refresh().await?;
        Ok(store)
    }

    /// Re-read the backend and republish
    pub async fn refresh(&self) -> Result<PlaylistSnapshot> {
        let snapshot: PlaylistSnapshot = Arc::new(self.backend.read_playlists().await?);
        self.published.send_replace(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Latest published playlists, ordered by id
    pub fn list(&self) -> PlaylistSnapshot {
        Arc::clone(&self.published.borrow())
    }

    /// Subscribe to playlist list changes
    pub fn subscribe(&self) -> watch::Receiver<PlaylistSnapshot> {
        self.published.subscribe()
    }

    /// Look up a playlist in the latest snapshot
    pub fn get(&self, id: PlaylistId) -> Option<Playlist> {
        self.published.borrow().iter().find(|p| p.id == id).cloned()
    }

    /// First playlist with the given title
    ///
    /// Titles are not unique; the lowest id wins.
    pub fn find_by_title(&self, title: &str) -> Option<Playlist> {
        self.published
            .borrow()
            .iter()
            .find(|p| p.title == title)
            .cloned()
    }

    /// Create an empty playlist
    ///
    /// # Errors
    /// [`HearthError::Validation`] if the title is empty or whitespace
    pub async fn create(&self, title: &str) -> Result<PlaylistId> {
        let title = title.trim();
        if title.is_empty() {
            return Err(HearthError::validation("Playlist title cannot be empty"));
        }

        let _guard = self.write_lock.lock().await;
        let id = self
            .backend
            .insert_playlist(CreatePlaylist::new(title))
            .await?;
        self.refresh().await?;

        info!("Created playlist {} ({})", title, id);
        Ok(id)
    }

    /// Append a track to a playlist
    ///
    /// # Errors
    /// [`HearthError::PlaylistNotFound`] if the playlist does not exist
    pub async fn add_track(&self, id: PlaylistId, track_id: TrackId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut playlist = require_playlist(id, self.backend.read_playlist(id).await?)?;

        debug!("Adding {} to playlist {}", track_id, id);
        playlist.push(track_id);
        self.backend.write_playlist(&playlist).await?;
        self.refresh().await?;
        Ok(())
    }

    /// Remove every occurrence of a track from a playlist
    ///
    /// # Errors
    /// [`HearthError::PlaylistNotFound`] if the playlist does not exist
    pub async fn remove_track(&self, id: PlaylistId, track_id: &TrackId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut playlist = require_playlist(id, self.backend.read_playlist(id).await?)?;

        if playlist.remove_all(track_id) > 0 {
            self.backend.write_playlist(&playlist).await?;
            self.refresh().await?;
        }
        Ok(())
    }

    /// Delete a playlist
    ///
    /// Removing an unknown id is a no-op.
    pub async fn remove(&self, id: PlaylistId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if self.backend.read_playlist(id).await?.is_none() {
            debug!("Ignoring removal of unknown playlist {}", id);
            return Ok(());
        }

        self.backend.delete_playlist(id).await?;
        self.refresh().await?;

        info!("Removed playlist {}", id);
        Ok(())
    }

    /// Drop a deleted track from every playlist referencing it
    ///
    /// Returns the number of playlists that changed. Stops at the first failed
    /// write; playlists written before it are still published.
    pub async fn purge_track(&self, track_id: &TrackId) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut changed = 0;
        let mut failure = None;

        for mut playlist in self.backend.read_playlists().await? {
            if playlist.remove_all(track_id) == 0 {
                continue;
            }
            if let Err(e) = self.backend.write_playlist(&playlist).await {
                warn!("Failed to purge {} from playlist {}: {}", track_id, playlist.id, e);
                failure = Some(e);
                break;
            }
            changed += 1;
        }

        if changed > 0 {
            self.refresh().await?;
            debug!("Purged {} from {} playlist(s)", track_id, changed);
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(changed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPlaylistBackend;

    fn store() -> PlaylistStore {
        PlaylistStore::new(Arc::new(MemoryPlaylistBackend::new()))
    }

    #[tokio::test]
    async fn create_then_list_has_one_empty_playlist() {
        let store = store();
        let id = store.create("Road Trip").await.unwrap();

        let list = store.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, id);
        assert_eq!(list[0].title, "Road Trip");
        assert!(list[0].tracks.is_empty());

        store.add_track(id, TrackId::new("/m/x.mp3")).await.unwrap();
        assert_eq!(store.list()[0].tracks, vec![TrackId::new("/m/x.mp3")]);
    }

    #[tokio::test]
    async fn empty_title_is_rejected_without_change() {
        let store = store();
        let err = store.create("   ").await.unwrap_err();

        assert!(matches!(err, HearthError::Validation(_)));
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn add_track_to_unknown_playlist_is_not_found() {
        let store = store();
        let err = store
            .add_track(PlaylistId::new(42), TrackId::new("/m/x.mp3"))
            .await
            .unwrap_err();

        assert!(matches!(err, HearthError::PlaylistNotFound(id) if id.get() == 42));
    }

    #[tokio::test]
    async fn removing_unknown_id_is_a_no_op() {
        let store = store();
        store.create("Keep").await.unwrap();
        let before = store.list();

        store.remove(PlaylistId::new(999)).await.unwrap();

        assert_eq!(*store.list(), *before);
    }

    #[tokio::test]
    async fn duplicate_titles_and_members_are_tolerated() {
        let store = store();
        let first = store.create("Mix").await.unwrap();
        let second = store.create("Mix").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(store.find_by_title("Mix").unwrap().id, first);

        let track = TrackId::new("/m/a.mp3");
        store.add_track(first, track.clone()).await.unwrap();
        store.add_track(first, track.clone()).await.unwrap();
        assert_eq!(store.get(first).unwrap().tracks.len(), 2);

        store.remove_track(first, &track).await.unwrap();
        assert!(store.get(first).unwrap().tracks.is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_every_write() {
        let store = store();
        let mut rx = store.subscribe();

        let id = store.create("Live").await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.remove(id).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn purge_track_updates_only_referencing_playlists() {
        let store = store();
        let a = store.create("A").await.unwrap();
        let b = store.create("B").await.unwrap();
        let gone = TrackId::new("/m/gone.mp3");
        let kept = TrackId::new("/m/kept.mp3");

        store.add_track(a, gone.clone()).await.unwrap();
        store.add_track(a, kept.clone()).await.unwrap();
        store.add_track(b, kept.clone()).await.unwrap();

        assert_eq!(store.purge_track(&gone).await.unwrap(), 1);
        assert_eq!(store.get(a).unwrap().tracks, vec![kept.clone()]);
        assert_eq!(store.get(b).unwrap().tracks, vec![kept]);
    }
}
