//! Integration tests for the selection engine
//!
//! Drives the engine through a recording port and checks what was played,
//! in which order, and how failures are recovered.

use hearth_core::{Playlist, PlaylistId, Track, TrackId};
use hearth_playback::{
    FilterField, PlayMode, PlaybackError, PlaybackPort, PlayerConfig, PlayerEvent, PlayerState,
    SelectionEngine, SortOption,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Test Helpers =====

#[derive(Debug, Clone, PartialEq)]
enum PortCall {
    Play(String),
    Pause,
    Resume,
    Seek(Duration),
}

/// Port recording every call; tracks listed in `broken` fail to play
#[derive(Default)]
struct RecordingPort {
    calls: Mutex<Vec<PortCall>>,
    broken: Mutex<HashSet<String>>,
}

impl RecordingPort {
    fn with_broken(ids: &[&str]) -> Self {
        let port = Self::default();
        port.broken
            .lock()
            .unwrap()
            .extend(ids.iter().map(|s| s.to_string()));
        port
    }

    fn calls(&self) -> Vec<PortCall> {
        self.calls.lock().unwrap().clone()
    }

    fn played(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PortCall::Play(id) => Some(id),
                _ => None,
            })
            .collect()
    }
}

impl PlaybackPort for RecordingPort {
    fn play(&self, track: &Track) -> hearth_playback::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(PortCall::Play(track.id.to_string()));
        if self.broken.lock().unwrap().contains(track.id.as_str()) {
            return Err(PlaybackError::unplayable(&track.id, "corrupt file"));
        }
        Ok(())
    }

    fn pause(&self) {
        self.calls.lock().unwrap().push(PortCall::Pause);
    }

    fn resume(&self) {
        self.calls.lock().unwrap().push(PortCall::Resume);
    }

    fn seek_to(&self, position: Duration) {
        self.calls.lock().unwrap().push(PortCall::Seek(position));
    }

    fn position(&self) -> Duration {
        Duration::ZERO
    }

    fn duration(&self) -> Option<Duration> {
        None
    }

    fn is_playing(&self) -> bool {
        false
    }
}

fn track(id: &str, title: &str) -> Track {
    Track::new(id, title)
}

fn abc() -> Vec<Track> {
    vec![track("a", "A"), track("b", "B"), track("c", "C")]
}

fn engine_with(port: Arc<RecordingPort>, catalog: Vec<Track>, mode: PlayMode) -> SelectionEngine {
    let config = PlayerConfig {
        default_play_mode: mode,
        ..PlayerConfig::default()
    };
    SelectionEngine::new(port, catalog, config).with_seed(1234)
}

// ===== Selection & Toggle =====

#[test]
fn select_toggle_cycle() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);

    assert_eq!(engine.select_track(&abc()[1]), Some(abc()[1].clone()));
    assert_eq!(engine.state(), PlayerState::Playing);
    assert_eq!(engine.current_title(), Some("B"));

    engine.toggle();
    assert_eq!(engine.state(), PlayerState::Paused);
    engine.toggle();
    assert_eq!(engine.state(), PlayerState::Playing);

    assert_eq!(
        port.calls(),
        vec![PortCall::Play("b".into()), PortCall::Pause, PortCall::Resume]
    );
}

#[test]
fn pause_only_acts_while_playing() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);

    engine.pause();
    assert_eq!(engine.state(), PlayerState::Idle);

    engine.select_track(&abc()[0]);
    engine.pause();
    engine.pause();
    assert_eq!(engine.state(), PlayerState::Paused);
    assert_eq!(port.calls().iter().filter(|c| **c == PortCall::Pause).count(), 1);
}

// ===== Play Modes =====

#[test]
fn normal_mode_follows_display_order() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);

    engine.select_track(&abc()[0]);
    engine.next();
    engine.next();
    engine.next();

    assert_eq!(port.played(), vec!["a", "b", "c", "a"]);
}

#[test]
fn normal_mode_starts_from_top_when_current_filtered_out() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);

    engine.select_track(&abc()[0]);
    engine.search("c");
    // Current track survives the filter
    assert_eq!(engine.current_title(), Some("A"));

    assert_eq!(engine.next(), Some(abc()[2].clone()));
}

#[test]
fn narrowed_search_keeps_history_within_display() {
    let port = Arc::new(RecordingPort::default());
    let catalog = vec![
        track("a", "Alpha"),
        track("b", "Bravo"),
        track("c", "Charlie"),
        track("d", "Delta"),
    ];
    let mut engine = engine_with(Arc::clone(&port), catalog.clone(), PlayMode::Normal);

    engine.select_track(&catalog[0]);
    engine.next();
    engine.next();
    assert_eq!(engine.history().len(), 3);

    // Nothing matches: the selection plays but is not recorded
    engine.search("zzz");
    assert_eq!(engine.select_track(&catalog[3]), Some(catalog[3].clone()));
    assert!(engine.history().len() <= engine.display_list().len());

    // Entries outside the narrowed list are dropped on the next selection
    engine.search("l");
    assert_eq!(engine.display_list().len(), 3);
    engine.select_track(&catalog[3]);
    assert!(engine.history().len() <= engine.display_list().len());
    assert!(engine
        .history()
        .get_all()
        .iter()
        .all(|t| engine.display_list().contains(t)));
    assert_eq!(engine.history().peek(), Some(&catalog[3]));
}

#[test]
fn repeat_one_replays_current() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::RepeatOne);

    engine.select_track(&abc()[1]);
    engine.next();
    engine.next();

    assert_eq!(port.played(), vec!["b", "b", "b"]);
}

#[test]
fn shuffle_three_tracks_covers_rest_before_repeat() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Shuffle);

    engine.select_track(&abc()[0]);
    let first = engine.next().unwrap();
    let second = engine.next().unwrap();

    let picked: HashSet<&str> = [first.id.as_str(), second.id.as_str()].into();
    assert_eq!(picked, HashSet::from(["b", "c"]));

    // Cycle complete: a new one starts and never replays the current track
    let third = engine.next().unwrap();
    assert_ne!(third, second);
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn shuffle_single_track_replays_it() {
    let port = Arc::new(RecordingPort::default());
    let only = vec![track("solo", "Solo")];
    let mut engine = engine_with(Arc::clone(&port), only.clone(), PlayMode::Shuffle);

    engine.select_track(&only[0]);
    assert_eq!(engine.next(), Some(only[0].clone()));
    assert_eq!(engine.next(), Some(only[0].clone()));
}

#[test]
fn next_on_empty_display_is_a_no_op() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Shuffle);

    engine.select_track(&abc()[0]);
    engine.search("zzz");
    assert!(engine.display_list().is_empty());

    assert_eq!(engine.next(), None);
    assert_eq!(engine.current_title(), Some("A"));
    assert_eq!(port.played(), vec!["a"]);
}

#[test]
fn play_mode_cycles() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(port, abc(), PlayMode::Shuffle);

    assert_eq!(engine.cycle_play_mode(), PlayMode::RepeatOne);
    assert_eq!(engine.cycle_play_mode(), PlayMode::Normal);
    assert_eq!(engine.cycle_play_mode(), PlayMode::Shuffle);
}

// ===== Previous =====

#[test]
fn previous_needs_two_selections() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);

    engine.select_track(&abc()[0]);
    assert_eq!(engine.previous(), None);
    assert_eq!(port.played(), vec!["a"]);
}

#[test]
fn previous_replays_prior_without_recording() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Shuffle);

    engine.select_track(&abc()[0]);
    let second = engine.next().unwrap();
    assert_eq!(engine.history().len(), 2);

    assert_eq!(engine.previous(), Some(abc()[0].clone()));
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.history().peek(), Some(&abc()[0]));

    // The undone track is eligible again
    assert!(!engine.history().contains(&second));
}

// ===== Failure Recovery =====

#[test]
fn unplayable_track_is_skipped_in_normal_mode() {
    let port = Arc::new(RecordingPort::with_broken(&["b"]));
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);

    assert_eq!(engine.select_track(&abc()[1]), Some(abc()[2].clone()));
    assert_eq!(port.played(), vec!["b", "c"]);
    assert_eq!(engine.state(), PlayerState::Playing);
    assert!(!engine.history().contains(&abc()[1]));
}

#[test]
fn repeat_one_recovers_sequentially() {
    let port = Arc::new(RecordingPort::with_broken(&["c"]));
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::RepeatOne);

    assert_eq!(engine.select_track(&abc()[2]), Some(abc()[0].clone()));
    assert_eq!(port.played(), vec!["c", "a"]);
}

#[test]
fn shuffle_recovery_never_retries_failed_track() {
    let port = Arc::new(RecordingPort::with_broken(&["a", "b"]));
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Shuffle);

    assert_eq!(engine.select_track(&abc()[0]), Some(abc()[2].clone()));

    let played = port.played();
    assert_eq!(played.last().map(String::as_str), Some("c"));
    let unique: HashSet<&String> = played.iter().collect();
    assert_eq!(unique.len(), played.len());
}

#[test]
fn all_tracks_failing_leaves_engine_idle() {
    let port = Arc::new(RecordingPort::with_broken(&["a", "b", "c"]));
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);

    assert_eq!(engine.select_track(&abc()[0]), None);
    assert_eq!(engine.state(), PlayerState::Idle);
    assert!(engine.current().is_none());
    assert_eq!(port.played(), vec!["a", "b", "c"]);
}

// ===== Search, Sort & Playlists =====

#[test]
fn search_sort_search_equals_single_sort() {
    let port = Arc::new(RecordingPort::default());
    let mut one = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);
    let mut two = engine_with(port, abc(), PlayMode::Normal);

    one.search("");
    one.sort(SortOption::TitleDescending);
    one.search("");

    two.sort(SortOption::TitleDescending);

    assert_eq!(one.display_list(), two.display_list());
    assert_eq!(one.display_list()[0].title, "C");
}

#[test]
fn cycle_filter_field_reapplies_search() {
    let catalog = vec![
        track("1", "Blue").with_artist("Miles"),
        track("2", "Miles Away").with_artist("Someone"),
    ];
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(port, catalog, PlayMode::Normal);

    engine.search("miles");
    assert_eq!(engine.display_list().len(), 1);
    assert_eq!(engine.display_list()[0].title, "Miles Away");

    assert_eq!(engine.cycle_filter_field(), FilterField::Artist);
    assert_eq!(engine.display_list()[0].title, "Blue");

    assert_eq!(engine.cycle_filter_field(), FilterField::Album);
    assert!(engine.display_list().is_empty());
}

#[test]
fn playlist_source_and_reset() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(port, abc(), PlayMode::Shuffle);

    let mut playlist = Playlist::new(PlaylistId::new(1), "Favs");
    playlist.push(TrackId::new("c"));
    playlist.push(TrackId::new("missing"));
    playlist.push(TrackId::new("a"));

    engine.select_playlist(Some(&playlist));
    let titles: Vec<String> = engine.display_list().iter().map(|t| t.title.clone()).collect();
    assert_eq!(titles, vec!["A", "C"]);
    assert!(engine.snapshot().playlist_active());

    engine.cycle_play_mode();
    engine.cycle_filter_field();
    engine.search("x");
    engine.reset();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.active_playlist, None);
    assert_eq!(snapshot.search_text, "");
    assert_eq!(snapshot.filter_field, FilterField::Title);
    assert_eq!(snapshot.play_mode, PlayMode::Shuffle);
    assert_eq!(snapshot.display.len(), 3);
}

#[test]
fn removed_active_playlist_falls_back_to_catalog() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(port, abc(), PlayMode::Normal);

    let mut playlist = Playlist::new(PlaylistId::new(7), "One");
    playlist.push(TrackId::new("b"));
    engine.select_playlist(Some(&playlist));
    assert_eq!(engine.display_list().len(), 1);

    playlist.push(TrackId::new("c"));
    engine.sync_playlists(std::slice::from_ref(&playlist));
    assert_eq!(engine.display_list().len(), 2);

    engine.sync_playlists(&[]);
    assert_eq!(engine.active_playlist(), None);
    assert_eq!(engine.display_list().len(), 3);
}

// ===== Events, Deletion & Positions =====

#[test]
fn events_map_to_actions() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);

    engine.select_track(&abc()[0]);
    engine.handle_event(PlayerEvent::Next);
    engine.handle_event(PlayerEvent::Toggle);
    engine.handle_event(PlayerEvent::Previous);

    assert_eq!(
        port.calls(),
        vec![
            PortCall::Play("a".into()),
            PortCall::Play("b".into()),
            PortCall::Pause,
            PortCall::Play("a".into()),
        ]
    );
    assert_eq!(engine.state(), PlayerState::Playing);
}

#[test]
fn declined_deletion_changes_nothing() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);

    engine.select_track(&abc()[1]);
    engine.handle_deletion(&abc()[1], false);

    assert_eq!(engine.catalog().len(), 3);
    assert_eq!(engine.current_title(), Some("B"));
}

#[test]
fn deleting_current_track_advances_and_evicts() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);

    engine.select_track(&abc()[0]);
    engine.select_track(&abc()[1]);
    engine.handle_deletion(&abc()[1], true);

    assert_eq!(engine.current_title(), Some("C"));
    assert_eq!(engine.catalog().len(), 2);
    assert!(!engine.display_list().contains(&abc()[1]));
    assert!(!engine.history().contains(&abc()[1]));
}

#[test]
fn deleting_last_track_stops() {
    let port = Arc::new(RecordingPort::default());
    let only = vec![track("solo", "Solo")];
    let mut engine = engine_with(Arc::clone(&port), only.clone(), PlayMode::RepeatOne);

    engine.select_track(&only[0]);
    engine.handle_deletion(&only[0], true);

    assert_eq!(engine.state(), PlayerState::Idle);
    assert!(engine.current().is_none());
}

#[test]
fn replace_catalog_rederives_display() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(port, abc(), PlayMode::Normal);
    engine.search("b");

    engine.replace_catalog(vec![track("b2", "Bee"), track("d", "D")]);

    assert_eq!(engine.catalog().len(), 2);
    assert_eq!(engine.display_list().len(), 1);
    assert_eq!(engine.display_list()[0].title, "Bee");
}

#[test]
fn resume_positions_seeks_after_play() {
    let port = Arc::new(RecordingPort::default());
    let config = PlayerConfig {
        default_play_mode: PlayMode::Normal,
        resume_positions: true,
        ..PlayerConfig::default()
    };
    let mut engine = SelectionEngine::new(Arc::clone(&port) as Arc<dyn PlaybackPort>, abc(), config);

    engine.select_track(&abc()[0]);
    engine.seek_to(Duration::from_secs(42));
    assert_eq!(engine.last_position(&abc()[0]), Some(Duration::from_secs(42)));

    engine.next();
    engine.previous();

    assert_eq!(
        port.calls(),
        vec![
            PortCall::Play("a".into()),
            PortCall::Seek(Duration::from_secs(42)),
            PortCall::Play("b".into()),
            PortCall::Play("a".into()),
            PortCall::Seek(Duration::from_secs(42)),
        ]
    );
}

#[test]
fn positions_are_not_applied_by_default() {
    let port = Arc::new(RecordingPort::default());
    let mut engine = engine_with(Arc::clone(&port), abc(), PlayMode::Normal);

    engine.remember_position(&abc()[2], Duration::from_secs(10));
    engine.select_track(&abc()[2]);

    assert_eq!(port.calls(), vec![PortCall::Play("c".into())]);
}
