//! Hearth CLI - command-line front end for the Hearth Player engine

pub mod catalog;
pub mod config;
pub mod error;
pub mod port;

pub use catalog::JsonCatalog;
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use port::ConsolePort;

use hearth_core::{CatalogProvider, Track};
use hearth_playback::{Player, PlaybackPort};
use hearth_storage::{MemoryPlaylistBackend, PlaylistStore, SqlitePlaylistBackend};
use std::sync::Arc;

/// Open the playlist store configured in `config`
///
/// An empty database URL keeps playlists in memory.
pub async fn open_playlists(config: &AppConfig) -> Result<PlaylistStore> {
    if !config.storage.is_persistent() {
        tracing::info!("Playlists kept in memory");
        return Ok(PlaylistStore::load(Arc::new(MemoryPlaylistBackend::new())).await?);
    }

    let pool = hearth_storage::create_pool(&config.storage.database_url).await?;
    hearth_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    Ok(PlaylistStore::load(Arc::new(SqlitePlaylistBackend::new(pool))).await?)
}

/// Build a player from configuration
pub async fn build_player(config: &AppConfig, port: Arc<dyn PlaybackPort>) -> Result<Player> {
    let catalog: Vec<Track> = JsonCatalog::new(&config.storage.catalog_path).list_tracks()?;
    tracing::info!("Loaded {} track(s)", catalog.len());

    let playlists = open_playlists(config).await?;
    Ok(Player::new(port, catalog, playlists, config.player.clone()))
}
