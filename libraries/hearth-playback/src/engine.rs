//! Selection engine - core orchestration
//!
//! Owns the display list, the play-mode policy, the play history and the
//! next/previous decision. Drives a [`PlaybackPort`] and publishes an
//! immutable [`EngineSnapshot`] after every mutation.

use crate::{
    filter::derive_display_list,
    history::PlayHistory,
    port::PlaybackPort,
    shuffle,
    types::{FilterField, PlayMode, PlayerConfig, PlayerEvent, PlayerState, SortOption},
};
use hearth_core::{Playlist, PlaylistId, Track, TrackId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Immutable view of the selection state
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    /// Track currently selected (playing or paused)
    pub current: Option<Track>,

    /// Playback state
    pub state: PlayerState,

    /// Next-track policy
    pub play_mode: PlayMode,

    /// Field matched by the search text
    pub filter_field: FilterField,

    /// Display-list ordering
    pub sort: SortOption,

    /// Applied search text
    pub search_text: String,

    /// Playlist the display list is drawn from, if any
    pub active_playlist: Option<PlaylistId>,

    /// Entries in the play history
    pub history_len: usize,

    /// Filtered and sorted tracks
    pub display: Arc<Vec<Track>>,
}

impl EngineSnapshot {
    /// Whether the display list comes from a playlist
    pub fn playlist_active(&self) -> bool {
        self.active_playlist.is_some()
    }
}

/// Search prepared for background computation
///
/// Produced by [`SelectionEngine::prepare_search`]; [`SearchRequest::run`] is
/// pure and can run on a blocking worker.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    generation: u64,
    source: Arc<Vec<Track>>,
    field: FilterField,
    text: String,
    sort: SortOption,
}

impl SearchRequest {
    /// Compute the display list for this request
    pub fn run(&self) -> Vec<Track> {
        derive_display_list(&self.source, self.field, &self.text, self.sort)
    }

    /// Search text of this request
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Generation the result is valid for
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Track selection and playback queue engine
pub struct SelectionEngine {
    port: Arc<dyn PlaybackPort>,
    config: PlayerConfig,

    // Sources
    catalog: Arc<Vec<Track>>,
    playlist: Option<Playlist>,
    source: Arc<Vec<Track>>,

    // Derived
    display: Arc<Vec<Track>>,
    search_generation: u64,

    // Selection state
    current: Option<Track>,
    state: PlayerState,
    play_mode: PlayMode,
    filter_field: FilterField,
    sort: SortOption,
    search_text: String,
    history: PlayHistory,

    // Last known position per track
    positions: HashMap<TrackId, Duration>,

    rng: StdRng,
    snapshots: watch::Sender<EngineSnapshot>,
}

impl SelectionEngine {
    /// Create an engine over a catalog
    pub fn new(port: Arc<dyn PlaybackPort>, catalog: Vec<Track>, config: PlayerConfig) -> Self {
        let catalog = Arc::new(catalog);
        let display = Arc::new(derive_display_list(
            &catalog,
            config.default_filter_field,
            "",
            config.default_sort,
        ));

        let initial = EngineSnapshot {
            current: None,
            state: PlayerState::Idle,
            play_mode: config.default_play_mode,
            filter_field: config.default_filter_field,
            sort: config.default_sort,
            search_text: String::new(),
            active_playlist: None,
            history_len: 0,
            display: Arc::clone(&display),
        };
        let (snapshots, _) = watch::channel(initial);

        Self {
            port,
            play_mode: config.default_play_mode,
            filter_field: config.default_filter_field,
            sort: config.default_sort,
            config,
            source: Arc::clone(&catalog),
            catalog,
            playlist: None,
            display,
            search_generation: 0,
            current: None,
            state: PlayerState::Idle,
            search_text: String::new(),
            history: PlayHistory::new(),
            positions: HashMap::new(),
            rng: StdRng::from_entropy(),
            snapshots,
        }
    }

    /// Use a deterministic shuffle sequence
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== Playback Control =====

    /// Select a track and start playing it
    ///
    /// When the port cannot play the track, the next track (per play mode) is
    /// tried instead; tracks that already failed in this chain are skipped.
    /// If every display track fails the engine becomes idle.
    ///
    /// # Returns
    /// The track actually playing, or `None` after giving up
    pub fn select_track(&mut self, track: &Track) -> Option<Track> {
        self.play_chain(track.clone(), true)
    }

    /// Play/pause
    ///
    /// No-op while idle.
    pub fn toggle(&mut self) {
        match self.state {
            PlayerState::Playing => {
                self.port.pause();
                self.state = PlayerState::Paused;
            }
            PlayerState::Paused => {
                self.port.resume();
                self.state = PlayerState::Playing;
            }
            PlayerState::Idle => return,
        }
        self.publish();
    }

    /// Pause if playing
    pub fn pause(&mut self) {
        if self.state == PlayerState::Playing {
            self.port.pause();
            self.state = PlayerState::Paused;
            self.publish();
        }
    }

    /// Advance according to the play mode
    ///
    /// No-op when nothing is selected or the display list is empty.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Track> {
        let current = self.current.clone()?;
        if self.display.is_empty() {
            return None;
        }

        let next = match self.play_mode {
            PlayMode::Shuffle => shuffle::pick_next(
                &self.display,
                &mut self.history,
                Some(&current),
                &mut self.rng,
            ),
            PlayMode::RepeatOne => Some(current),
            PlayMode::Normal => self.following(&current),
        }?;

        self.select_track(&next)
    }

    /// Go back one step in the play history
    ///
    /// Needs at least two history entries. The replayed track is not recorded
    /// again, so shuffle coverage is unchanged.
    pub fn previous(&mut self) -> Option<Track> {
        let target = self.history.step_back()?;
        debug!("Stepping back to {}", target.id);
        self.play_chain(target, false)
    }

    /// Seek within the current track
    ///
    /// The position is remembered for the track. No-op while idle.
    pub fn seek_to(&mut self, position: Duration) {
        if let Some(track) = &self.current {
            self.port.seek_to(position);
            self.positions.insert(track.id.clone(), position);
        }
    }

    /// Dispatch a remote/notification action
    pub fn handle_event(&mut self, event: PlayerEvent) {
        debug!("Handling {:?}", event);
        match event {
            PlayerEvent::Previous => {
                self.previous();
            }
            PlayerEvent::Toggle => self.toggle(),
            PlayerEvent::Next => {
                self.next();
            }
        }
    }

    // ===== Search, Filter & Sort =====

    /// Apply search text and recompute the display list immediately
    ///
    /// The current track keeps playing even if it is filtered out.
    pub fn search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.refilter();
    }

    /// Record search text and hand back the work to compute its result
    ///
    /// Any request prepared earlier becomes stale.
    pub fn prepare_search(&mut self, text: impl Into<String>) -> SearchRequest {
        self.search_text = text.into();
        self.search_generation += 1;

        SearchRequest {
            generation: self.search_generation,
            source: Arc::clone(&self.source),
            field: self.filter_field,
            text: self.search_text.clone(),
            sort: self.sort,
        }
    }

    /// Apply a computed search result
    ///
    /// Returns `false` (and changes nothing) when a newer search or a
    /// synchronous recompute happened since the request was prepared.
    pub fn complete_search(&mut self, request: SearchRequest, display: Vec<Track>) -> bool {
        if request.generation != self.search_generation {
            debug!(
                "Discarding stale search {:?} (generation {} < {})",
                request.text, request.generation, self.search_generation
            );
            return false;
        }

        let matched = display.len();
        debug!("Search {:?} matched {} track(s)", request.text, matched);
        self.display = Arc::new(display);
        self.publish();
        true
    }

    /// Clear the search text
    pub fn clear_search(&mut self) {
        self.search(String::new());
    }

    /// Change the sort option and re-sort the display list
    pub fn sort(&mut self, option: SortOption) {
        self.sort = option;
        self.refilter();
    }

    /// Advance the filter field and re-run the current search
    pub fn cycle_filter_field(&mut self) -> FilterField {
        self.filter_field = self.filter_field.next();
        self.refilter();
        self.filter_field
    }

    /// Advance the play mode
    pub fn cycle_play_mode(&mut self) -> PlayMode {
        self.play_mode = self.play_mode.next();
        info!("Play mode: {:?}", self.play_mode);
        self.publish();
        self.play_mode
    }

    /// Draw the display list from a playlist, or from the catalog with `None`
    pub fn select_playlist(&mut self, playlist: Option<&Playlist>) {
        self.playlist = playlist.cloned();
        match &self.playlist {
            Some(p) => info!("Showing playlist {} ({})", p.title, p.id),
            None => info!("Showing whole catalog"),
        }
        self.rebuild_source();
        self.refilter();
    }

    /// Follow changes to stored playlists
    ///
    /// Re-resolves the active playlist, or falls back to the catalog when it
    /// was removed.
    pub fn sync_playlists(&mut self, playlists: &[Playlist]) {
        let Some(active) = &self.playlist else {
            return;
        };

        let updated = playlists.iter().find(|p| p.id == active.id).cloned();
        if updated.as_ref() == Some(active) {
            return;
        }
        if updated.is_none() {
            info!("Active playlist {} was removed", active.id);
        }

        self.playlist = updated;
        self.rebuild_source();
        self.refilter();
    }

    /// Return to the initial browsing state
    ///
    /// Clears the search, restores the configured filter field and play mode
    /// and shows the whole catalog. The current track keeps playing.
    pub fn reset(&mut self) {
        self.search_text.clear();
        self.filter_field = self.config.default_filter_field;
        self.play_mode = self.config.default_play_mode;
        self.playlist = None;
        self.rebuild_source();
        self.refilter();
    }

    // ===== Catalog =====

    /// Replace the catalog after a rescan
    pub fn replace_catalog(&mut self, tracks: Vec<Track>) {
        info!("Catalog replaced with {} track(s)", tracks.len());
        self.catalog = Arc::new(tracks);

        let known: HashSet<&TrackId> = self.catalog.iter().map(|t| &t.id).collect();
        let gone: Vec<Track> = self
            .history
            .get_all()
            .iter()
            .filter(|t| !known.contains(&t.id))
            .cloned()
            .collect();
        for track in &gone {
            self.history.remove(track);
        }

        self.rebuild_source();
        self.refilter();
    }

    /// React to a track deletion request
    ///
    /// `deleted` is the confirmation result; `false` leaves everything as is.
    /// A deleted current track is replaced by the next one first.
    pub fn handle_deletion(&mut self, track: &Track, deleted: bool) {
        if !deleted {
            return;
        }

        info!("Track deleted: {}", track.id);
        let was_current = self.current.as_ref() == Some(track);
        let display_index = self.display.iter().position(|t| t == track);

        self.catalog = Arc::new(
            self.catalog
                .iter()
                .filter(|t| *t != track)
                .cloned()
                .collect(),
        );
        self.history.remove(track);
        self.positions.remove(&track.id);
        self.rebuild_source();
        self.refilter();

        if !was_current {
            return;
        }

        let replacement = match self.play_mode {
            PlayMode::Shuffle => shuffle::pick_next(
                &self.display,
                &mut self.history,
                Some(track),
                &mut self.rng,
            ),
            // The track that followed the deleted one now sits at its index
            PlayMode::RepeatOne | PlayMode::Normal if !self.display.is_empty() => {
                let index = display_index.unwrap_or(0) % self.display.len();
                self.display.get(index).cloned()
            }
            _ => None,
        };

        match replacement {
            Some(next) => {
                self.select_track(&next);
            }
            None => self.stop(),
        }
    }

    // ===== Positions =====

    /// Remember where playback of a track stopped
    pub fn remember_position(&mut self, track: &Track, position: Duration) {
        self.positions.insert(track.id.clone(), position);
    }

    /// Last remembered position of a track
    pub fn last_position(&self, track: &Track) -> Option<Duration> {
        self.positions.get(&track.id).copied()
    }

    // ===== Queries =====

    /// Current track
    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Title of the current track
    pub fn current_title(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.title.as_str())
    }

    /// Playback state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Play mode
    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    /// Filter field
    pub fn filter_field(&self) -> FilterField {
        self.filter_field
    }

    /// Sort option
    pub fn sort_option(&self) -> SortOption {
        self.sort
    }

    /// Applied search text
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Number of searches prepared or recomputed so far
    pub fn search_generation(&self) -> u64 {
        self.search_generation
    }

    /// Filtered and sorted tracks
    pub fn display_list(&self) -> Arc<Vec<Track>> {
        Arc::clone(&self.display)
    }

    /// Every known track
    pub fn catalog(&self) -> Arc<Vec<Track>> {
        Arc::clone(&self.catalog)
    }

    /// Play history of the current cycle
    pub fn history(&self) -> &PlayHistory {
        &self.history
    }

    /// Active playlist id
    pub fn active_playlist(&self) -> Option<PlaylistId> {
        self.playlist.as_ref().map(|p| p.id)
    }

    /// Capture the current state
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            current: self.current.clone(),
            state: self.state,
            play_mode: self.play_mode,
            filter_field: self.filter_field,
            sort: self.sort,
            search_text: self.search_text.clone(),
            active_playlist: self.active_playlist(),
            history_len: self.history.len(),
            display: Arc::clone(&self.display),
        }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshots.subscribe()
    }

    // ===== Internal =====

    /// Try `first`, then recovery candidates, until one plays
    fn play_chain(&mut self, first: Track, record: bool) -> Option<Track> {
        let mut failed: HashSet<TrackId> = HashSet::new();
        let mut candidate = first;
        let mut record = record;

        loop {
            match self.port.play(&candidate) {
                Ok(()) => {
                    self.start_playing(&candidate, record);
                    return Some(candidate);
                }
                Err(e) => {
                    warn!("Failed to play {}: {}", candidate.id, e);
                    failed.insert(candidate.id.clone());

                    match self.recovery_candidate(&candidate, &failed) {
                        Some(next) => {
                            debug!("Recovering with {}", next.id);
                            candidate = next;
                            record = true;
                        }
                        None => {
                            warn!("No playable track left, giving up");
                            self.stop();
                            return None;
                        }
                    }
                }
            }
        }
    }

    fn start_playing(&mut self, track: &Track, record: bool) {
        if record && self.history.record(track, &self.display) {
            debug!("History cleared, new cycle");
        }

        self.current = Some(track.clone());
        self.state = PlayerState::Playing;

        if self.config.resume_positions {
            if let Some(position) = self.last_position(track).filter(|p| !p.is_zero()) {
                debug!("Resuming {} at {:?}", track.id, position);
                self.port.seek_to(position);
            }
        }

        info!("Playing {}", track.id);
        self.publish();
    }

    /// Next track to try after `failed_track` could not play
    fn recovery_candidate(&mut self, failed_track: &Track, failed: &HashSet<TrackId>) -> Option<Track> {
        match self.play_mode {
            PlayMode::Shuffle => {
                let open: Vec<&Track> = self
                    .display
                    .iter()
                    .filter(|t| !failed.contains(&t.id))
                    .collect();
                let fresh: Vec<&Track> = open
                    .iter()
                    .copied()
                    .filter(|t| !self.history.contains(t))
                    .collect();

                let pool = if fresh.is_empty() { open } else { fresh };
                pool.choose(&mut self.rng).map(|t| (*t).clone())
            }
            PlayMode::RepeatOne | PlayMode::Normal => {
                let len = self.display.len();
                let start = self
                    .display
                    .iter()
                    .position(|t| t == failed_track)
                    .map(|i| i + 1)
                    .unwrap_or(0);

                (0..len)
                    .map(|offset| &self.display[(start + offset) % len])
                    .find(|t| !failed.contains(&t.id))
                    .cloned()
            }
        }
    }

    /// Track after `current` in the display list, wrapping
    fn following(&self, current: &Track) -> Option<Track> {
        let index = match self.display.iter().position(|t| t == current) {
            Some(i) => (i + 1) % self.display.len(),
            None => 0,
        };
        self.display.get(index).cloned()
    }

    fn stop(&mut self) {
        if self.state == PlayerState::Playing {
            self.port.pause();
        }
        self.current = None;
        self.state = PlayerState::Idle;
        self.publish();
    }

    fn rebuild_source(&mut self) {
        self.source = match &self.playlist {
            Some(playlist) => Arc::new(playlist.resolve(&self.catalog)),
            None => Arc::clone(&self.catalog),
        };
    }

    /// Recompute the display list synchronously
    ///
    /// Invalidates any search still computing in the background.
    fn refilter(&mut self) {
        self.search_generation += 1;
        self.display = Arc::new(derive_display_list(
            &self.source,
            self.filter_field,
            &self.search_text,
            self.sort,
        ));
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

impl std::fmt::Debug for SelectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("current", &self.current)
            .field("state", &self.state)
            .field("play_mode", &self.play_mode)
            .field("display_len", &self.display.len())
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}
