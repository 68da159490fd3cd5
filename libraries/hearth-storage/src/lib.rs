//! Hearth Player Storage
//!
//! Playlist persistence for Hearth Player.
//!
//! # Architecture
//!
//! - **Backends**: `SQLite` via `sqlx` ([`SqlitePlaylistBackend`]) and an in-memory
//!   map ([`MemoryPlaylistBackend`]), both implementing
//!   [`hearth_core::PlaylistBackend`]
//! - **Vertical Slicing**: the `playlists` module owns its queries
//! - **Observable Store**: [`PlaylistStore`] is the single writer; after every
//!   mutation it re-reads the backend and republishes the full list
//!
//! # Example
//!
//! ```rust,no_run
//! use hearth_storage::{create_pool, run_migrations, PlaylistStore, SqlitePlaylistBackend};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://hearth.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = PlaylistStore::load(Arc::new(SqlitePlaylistBackend::new(pool))).await?;
//! let id = store.create("Road Trip").await?;
//! assert_eq!(store.get(id).map(|p| p.title), Some("Road Trip".to_string()));
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod memory;
mod store;

// Vertical slices
pub mod playlists;

pub use context::SqlitePlaylistBackend;
pub use error::{Result, StorageError};
pub use memory::MemoryPlaylistBackend;
pub use store::{PlaylistSnapshot, PlaylistStore};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://hearth.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating SQLite pool for {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
