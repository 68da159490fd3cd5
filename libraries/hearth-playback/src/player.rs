//! Player - the single state owner
//!
//! Wires the selection engine to the playlist store, the sleep timer and the
//! debounced search. The engine sits behind one mutex that is never held
//! across an `.await`; observers read immutable snapshots.

use crate::{
    debounce::Debouncer,
    engine::{EngineSnapshot, SelectionEngine},
    port::PlaybackPort,
    sleep_timer::{SleepTimer, SleepTimerState},
    types::{FilterField, PlayMode, PlayerConfig, PlayerEvent, PlayerState, SortOption},
};
use hearth_core::{CatalogProvider, HearthError, PlaylistId, Result, Track};
use hearth_storage::{PlaylistSnapshot, PlaylistStore};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Music player facade for the UI layer
pub struct Player {
    engine: Arc<Mutex<SelectionEngine>>,
    snapshots: watch::Receiver<EngineSnapshot>,
    playlists: PlaylistStore,
    sleep_timer: SleepTimer,
    search_debouncer: Debouncer,
}

impl Player {
    /// Create a player over a catalog and a loaded playlist store
    pub fn new(
        port: Arc<dyn PlaybackPort>,
        catalog: Vec<Track>,
        playlists: PlaylistStore,
        config: PlayerConfig,
    ) -> Self {
        let engine = SelectionEngine::new(port, catalog, config.clone());
        Self::with_engine(engine, playlists, &config)
    }

    /// Create a player around an existing engine
    pub fn with_engine(engine: SelectionEngine, playlists: PlaylistStore, config: &PlayerConfig) -> Self {
        let snapshots = engine.subscribe();
        Self {
            engine: Arc::new(Mutex::new(engine)),
            snapshots,
            playlists,
            sleep_timer: SleepTimer::new(config.max_sleep_minutes),
            search_debouncer: Debouncer::new(config.search_debounce()),
        }
    }

    // ===== Search, Filter & Sort =====

    /// Debounced search
    ///
    /// Only the last text of a burst is applied. Filtering runs on a blocking
    /// worker; results overtaken by a newer search are dropped. Must be
    /// called from within a Tokio runtime.
    pub fn search(&self, text: impl Into<String>) {
        let engine = Arc::clone(&self.engine);
        let text = text.into();

        self.search_debouncer.call(async move {
            let request = lock(&engine).prepare_search(text);

            let computed = tokio::task::spawn_blocking(move || {
                let display = request.run();
                (request, display)
            })
            .await;

            match computed {
                Ok((request, display)) => {
                    lock(&engine).complete_search(request, display);
                }
                Err(e) => warn!("Search worker failed: {}", e),
            }
        });
    }

    /// Apply search text immediately, dropping any pending debounced search
    pub fn search_now(&self, text: impl Into<String>) {
        self.search_debouncer.cancel();
        self.engine().search(text);
    }

    /// Change the sort option
    pub fn sort(&self, option: SortOption) {
        self.engine().sort(option);
    }

    /// Advance the filter field
    pub fn cycle_filter_field(&self) -> FilterField {
        self.engine().cycle_filter_field()
    }

    /// Advance the play mode
    pub fn cycle_play_mode(&self) -> PlayMode {
        self.engine().cycle_play_mode()
    }

    /// Return to the initial browsing state
    pub fn reset(&self) {
        self.search_debouncer.cancel();
        self.engine().reset();
    }

    // ===== Playback Control =====

    /// Select and play a track
    pub fn select_track(&self, track: &Track) -> Option<Track> {
        self.engine().select_track(track)
    }

    /// Play/pause
    pub fn toggle(&self) {
        self.engine().toggle();
    }

    /// Advance according to the play mode
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<Track> {
        self.engine().next()
    }

    /// Go back in the play history
    pub fn previous(&self) -> Option<Track> {
        self.engine().previous()
    }

    /// Seek within the current track
    pub fn seek_to(&self, position: Duration) {
        self.engine().seek_to(position);
    }

    /// Dispatch a remote/notification action
    pub fn handle_event(&self, event: PlayerEvent) {
        self.engine().handle_event(event);
    }

    // ===== Sleep Timer =====

    /// Pause playback after `minutes`
    ///
    /// # Errors
    /// [`HearthError::Validation`] when `minutes` is out of range
    pub fn start_sleep_timer(&self, minutes: u32) -> Result<()> {
        let engine = Arc::clone(&self.engine);
        self.sleep_timer.start(minutes, move || {
            info!("Sleep timer pausing playback");
            lock(&engine).pause();
        })
    }

    /// Stop the sleep timer without pausing
    pub fn cancel_sleep_timer(&self) -> bool {
        self.sleep_timer.cancel()
    }

    /// Observable countdown
    pub fn sleep_timer(&self) -> watch::Receiver<Option<SleepTimerState>> {
        self.sleep_timer.subscribe()
    }

    // ===== Playlists =====

    /// Create an empty playlist
    ///
    /// # Errors
    /// [`HearthError::Validation`] for an empty title, or a storage error
    pub async fn create_playlist(&self, title: &str) -> Result<PlaylistId> {
        self.playlists.create(title).await
    }

    /// Append a track to a playlist
    ///
    /// # Errors
    /// [`HearthError::PlaylistNotFound`] if the playlist does not exist
    pub async fn add_track_to_playlist(&self, id: PlaylistId, track: &Track) -> Result<()> {
        self.playlists.add_track(id, track.id.clone()).await?;
        self.sync_playlists();
        Ok(())
    }

    /// Delete a playlist; unknown ids are ignored
    pub async fn remove_playlist(&self, id: PlaylistId) -> Result<()> {
        self.playlists.remove(id).await?;
        self.sync_playlists();
        Ok(())
    }

    /// Show a playlist, or the whole catalog with `None`
    ///
    /// # Errors
    /// [`HearthError::PlaylistNotFound`] if the playlist does not exist
    pub fn select_playlist(&self, id: Option<PlaylistId>) -> Result<()> {
        match id {
            Some(id) => {
                let playlist = self
                    .playlists
                    .get(id)
                    .ok_or(HearthError::PlaylistNotFound(id))?;
                self.engine().select_playlist(Some(&playlist));
            }
            None => self.engine().select_playlist(None),
        }
        Ok(())
    }

    /// Observable playlist list
    pub fn playlists(&self) -> watch::Receiver<PlaylistSnapshot> {
        self.playlists.subscribe()
    }

    /// Playlist store
    pub fn playlist_store(&self) -> &PlaylistStore {
        &self.playlists
    }

    // ===== Catalog =====

    /// Reload the catalog from a provider
    ///
    /// The provider runs before the engine is locked. Returns the new track
    /// count.
    pub fn refresh_catalog(&self, provider: &dyn CatalogProvider) -> Result<usize> {
        let tracks = provider.list_tracks()?;
        let count = tracks.len();
        self.engine().replace_catalog(tracks);
        Ok(count)
    }

    /// React to a deletion request
    ///
    /// On confirmation the track also leaves every playlist.
    pub async fn handle_deletion(&self, track: &Track, deleted: bool) -> Result<()> {
        if !deleted {
            debug!("Deletion of {} not confirmed", track.id);
            return Ok(());
        }

        self.engine().handle_deletion(track, true);
        let changed = self.playlists.purge_track(&track.id).await?;
        if changed > 0 {
            self.sync_playlists();
        }
        Ok(())
    }

    // ===== Observables =====

    /// Subscribe to engine snapshots
    pub fn snapshots(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshots.clone()
    }

    /// Latest engine snapshot
    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Playback state
    pub fn state(&self) -> PlayerState {
        self.snapshots.borrow().state
    }

    /// Read engine state under the lock
    pub fn inspect<R>(&self, f: impl FnOnce(&SelectionEngine) -> R) -> R {
        f(&self.engine())
    }

    fn sync_playlists(&self) {
        let playlists = self.playlists.list();
        self.engine().sync_playlists(&playlists);
    }

    fn engine(&self) -> MutexGuard<'_, SelectionEngine> {
        lock(&self.engine)
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("snapshot", &*self.snapshots.borrow())
            .field("sleep_timer", &self.sleep_timer.state())
            .finish_non_exhaustive()
    }
}

fn lock(engine: &Mutex<SelectionEngine>) -> MutexGuard<'_, SelectionEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}
