//! JSON catalog manifest
//!
//! The device scanner writes the catalog as a JSON array of tracks:
//!
//! ```json
//! [
//!   { "id": "/music/rock/song.mp3", "title": "Song", "artist": "Band" }
//! ]
//! ```

use hearth_core::{CatalogProvider, Result, Track};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Catalog read from a JSON manifest on every call
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogProvider for JsonCatalog {
    fn list_tracks(&self) -> Result<Vec<Track>> {
        let raw = std::fs::read_to_string(&self.path)?;
        let tracks: Vec<Track> = serde_json::from_str(&raw)?;
        debug!("Read {} track(s) from {}", tracks.len(), self.path.display());
        Ok(tracks)
    }
}
