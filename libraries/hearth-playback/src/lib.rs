//! Hearth Player - Track Selection & Playback Queue
//!
//! Platform-agnostic selection engine for Hearth Player.
//!
//! This crate provides:
//! - Filter/sort pipeline deriving the display list (title, artist, album search)
//! - Play modes (Shuffle, RepeatOne, Normal)
//! - Play history bounded by the display list (no repeat within a shuffle cycle)
//! - Playback failure recovery
//! - Debounced search computed off the state lock
//! - Cancellable sleep timer
//!
//! # Architecture
//!
//! Audio output is reached through the [`PlaybackPort`] trait; decoding and
//! device handling stay outside this crate. [`SelectionEngine`] is a plain
//! synchronous state machine, and [`Player`] wraps it with the playlist store
//! and the async pieces (debounce, sleep timer).
//!
//! # Example
//!
//! ```rust
//! use hearth_core::Track;
//! use hearth_playback::{NullPort, PlayMode, PlayerConfig, SelectionEngine};
//! use std::sync::Arc;
//!
//! let catalog = vec![
//!     Track::new("/music/a.mp3", "Alpha"),
//!     Track::new("/music/b.mp3", "Bravo"),
//! ];
//! let config = PlayerConfig {
//!     default_play_mode: PlayMode::Normal,
//!     ..PlayerConfig::default()
//! };
//! let mut engine = SelectionEngine::new(Arc::new(NullPort), catalog.clone(), config);
//!
//! engine.select_track(&catalog[0]);
//! assert_eq!(engine.next(), Some(catalog[1].clone()));
//! assert_eq!(engine.previous(), Some(catalog[0].clone()));
//! ```

#![forbid(unsafe_code)]

pub mod debounce;
pub mod engine;
pub mod error;
pub mod filter;
pub mod history;
pub mod player;
pub mod port;
pub mod shuffle;
pub mod sleep_timer;
pub mod types;

pub use debounce::Debouncer;
pub use engine::{EngineSnapshot, SearchRequest, SelectionEngine};
pub use error::{PlaybackError, Result};
pub use filter::derive_display_list;
pub use history::PlayHistory;
pub use player::Player;
pub use port::{NullPort, PlaybackPort};
pub use sleep_timer::{SleepTimer, SleepTimerState};
pub use types::{FilterField, PlayMode, PlayerConfig, PlayerEvent, PlayerState, SortOption};
