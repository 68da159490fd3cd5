//! Core types for track selection

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state of the selection engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// Nothing selected yet
    #[default]
    Idle,

    /// Current track is playing
    Playing,

    /// Current track is paused
    Paused,
}

/// Policy for choosing the next track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// Random order, every track once per cycle
    #[default]
    Shuffle,

    /// Replay the current track
    RepeatOne,

    /// Display-list order, wrapping at the end
    Normal,
}

impl PlayMode {
    /// Next mode in the cycle `Shuffle -> RepeatOne -> Normal -> Shuffle`
    pub fn next(self) -> Self {
        match self {
            Self::Shuffle => Self::RepeatOne,
            Self::RepeatOne => Self::Normal,
            Self::Normal => Self::Shuffle,
        }
    }
}

/// Track field matched by search text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    /// Track title
    #[default]
    Title,

    /// Artist name
    Artist,

    /// Album name
    Album,
}

impl FilterField {
    /// Next field in the cycle `Title -> Artist -> Album -> Title`
    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Artist,
            Self::Artist => Self::Album,
            Self::Album => Self::Title,
        }
    }
}

/// Display-list ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Title A to Z
    #[default]
    TitleAscending,

    /// Title Z to A
    TitleDescending,

    /// Artist A to Z, then title
    ArtistAscending,

    /// Containing folder, then title
    Folder,

    /// Newest first; tracks without a date last
    RecentlyAdded,
}

/// Remote/notification actions forwarded to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Go back in history
    Previous,

    /// Play/pause
    Toggle,

    /// Advance per play mode
    Next,
}

/// Configuration for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Quiet window before a search recomputes (default: 300ms)
    pub search_debounce_ms: u64,

    /// Play mode after construction and reset (default: Shuffle)
    pub default_play_mode: PlayMode,

    /// Filter field after construction and reset (default: Title)
    pub default_filter_field: FilterField,

    /// Initial sort option (default: `TitleAscending`)
    pub default_sort: SortOption,

    /// Longest accepted sleep timer (default: 60 minutes)
    pub max_sleep_minutes: u32,

    /// Seek to the remembered position when a track is selected (default: false)
    pub resume_positions: bool,
}

impl PlayerConfig {
    /// Debounce window as a `Duration`
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            default_play_mode: PlayMode::Shuffle,
            default_filter_field: FilterField::Title,
            default_sort: SortOption::TitleAscending,
            max_sleep_minutes: 60,
            resume_positions: false,
        }
    }
}
