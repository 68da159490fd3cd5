//! Hearth Player Core
//!
//! Platform-agnostic core types, traits, and error handling for Hearth Player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist` and their identifiers
//! - **Collaborator Traits**: `CatalogProvider`, `PlaylistBackend`
//! - **Error Handling**: Unified `HearthError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use hearth_core::types::{Playlist, PlaylistId, Track, TrackId};
//!
//! let track = Track::new("/music/road/song.mp3", "My Favorite Song");
//! let mut playlist = Playlist::new(PlaylistId::new(1), "Road Trip");
//! playlist.push(track.id.clone());
//!
//! assert_eq!(playlist.resolve(&[track.clone()]), vec![track]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{HearthError, Result};
pub use traits::{CatalogProvider, PlaylistBackend, StaticCatalog};
pub use types::{CreatePlaylist, Playlist, PlaylistId, Track, TrackId};
