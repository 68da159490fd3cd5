//! Platform-agnostic playback port
//!
//! Abstracts the audio output the engine drives. Decoding and device handling
//! live behind this trait (desktop output, mobile media player, test doubles).

use crate::error::Result;
use hearth_core::Track;
use std::time::Duration;

/// Output the selection engine drives
///
/// Implementors start, pause, resume and seek the actual audio. All methods
/// are called with the engine lock held and must not block for long.
pub trait PlaybackPort: Send + Sync {
    /// Start playing a track from the beginning
    ///
    /// # Returns
    /// * `Ok(())` - Track is playing
    /// * `Err(_)` - Track could not be started (the engine moves on)
    fn play(&self, track: &Track) -> Result<()>;

    /// Pause the current track
    fn pause(&self);

    /// Resume the paused track
    fn resume(&self);

    /// Seek within the current track
    fn seek_to(&self, position: Duration);

    /// Current position in the playing track
    fn position(&self) -> Duration;

    /// Duration of the playing track, once known
    fn duration(&self) -> Option<Duration>;

    /// Whether audio is currently audible
    fn is_playing(&self) -> bool;
}

/// Port that accepts every command and plays nothing
///
/// Useful when the engine runs headless (library browsing, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPort;

impl PlaybackPort for NullPort {
    fn play(&self, _track: &Track) -> Result<()> {
        Ok(())
    }

    fn pause(&self) {}

    fn resume(&self) {}

    fn seek_to(&self, _position: Duration) {}

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
