/// Playback port for the command line
use hearth_core::Track;
use hearth_playback::{PlaybackError, PlaybackPort};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

/// Reports playback commands instead of producing audio
///
/// With `verify_files` set, tracks whose file is missing are unplayable,
/// which exercises the engine's recovery.
#[derive(Debug, Default)]
pub struct ConsolePort {
    verify_files: bool,
    playing: AtomicBool,
    position: Mutex<Duration>,
}

impl ConsolePort {
    pub fn new(verify_files: bool) -> Self {
        Self {
            verify_files,
            ..Self::default()
        }
    }

    fn set_position(&self, position: Duration) {
        *self
            .position
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = position;
    }
}

impl PlaybackPort for ConsolePort {
    fn play(&self, track: &Track) -> hearth_playback::Result<()> {
        if self.verify_files && !std::path::Path::new(track.id.as_str()).exists() {
            return Err(PlaybackError::unplayable(&track.id, "file not found"));
        }

        info!("Playing {}", track.title);
        self.playing.store(true, Ordering::SeqCst);
        self.set_position(Duration::ZERO);
        Ok(())
    }

    fn pause(&self) {
        info!("Paused");
        self.playing.store(false, Ordering::SeqCst);
    }

    fn resume(&self) {
        info!("Resumed");
        self.playing.store(true, Ordering::SeqCst);
    }

    fn seek_to(&self, position: Duration) {
        info!("Seek to {:?}", position);
        self.set_position(position);
    }

    fn position(&self) -> Duration {
        *self
            .position
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn duration(&self) -> Option<Duration> {
        None
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}
