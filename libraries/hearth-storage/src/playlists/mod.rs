use crate::error::{Result, StorageError};
use hearth_core::types::{CreatePlaylist, Playlist, PlaylistId, TrackId};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;

/// Get all playlists with their members, ordered by id
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query("SELECT id, title FROM playlists ORDER BY id")
        .fetch_all(pool)
        .await?;

    let mut playlists: BTreeMap<i64, Playlist> = rows
        .into_iter()
        .map(|row| {
            let id: i64 = row.get("id");
            (id, Playlist::new(PlaylistId::new(id), row.get::<String, _>("title")))
        })
        .collect();

    let member_rows = sqlx::query(
        r#"
        SELECT playlist_id, track_id
        FROM playlist_tracks
        ORDER BY playlist_id, position
        "#,
    )
    .fetch_all(pool)
    .await?;

    for row in member_rows {
        let playlist_id: i64 = row.get("playlist_id");
        if let Some(playlist) = playlists.get_mut(&playlist_id) {
            playlist.push(TrackId::new(row.get::<String, _>("track_id")));
        }
    }

    Ok(playlists.into_values().collect())
}

/// Get playlist by ID with its members
pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let Some(row) = sqlx::query("SELECT id, title FROM playlists WHERE id = ?")
        .bind(id.get())
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let mut playlist = Playlist::new(id, row.get::<String, _>("title"));

    let member_rows = sqlx::query(
        "SELECT track_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY position",
    )
    .bind(id.get())
    .fetch_all(pool)
    .await?;

    for row in member_rows {
        playlist.push(TrackId::new(row.get::<String, _>("track_id")));
    }

    Ok(Some(playlist))
}

/// Create new, empty playlist
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<PlaylistId> {
    let result = sqlx::query("INSERT INTO playlists (title) VALUES (?)")
        .bind(&playlist.title)
        .execute(pool)
        .await?;

    Ok(PlaylistId::new(result.last_insert_rowid()))
}

/// Replace title and members of an existing playlist
///
/// Members are rewritten with dense positions inside one transaction.
pub async fn update(pool: &SqlitePool, playlist: &Playlist) -> Result<()> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE playlists SET title = ?, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(&playlist.title)
    .bind(playlist.id.get())
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(StorageError::PlaylistNotFound(playlist.id));
    }

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ?")
        .bind(playlist.id.get())
        .execute(&mut *tx)
        .await?;

    for (position, track_id) in playlist.tracks.iter().enumerate() {
        sqlx::query(
            "INSERT INTO playlist_tracks (playlist_id, position, track_id) VALUES (?, ?, ?)",
        )
        .bind(playlist.id.get())
        .bind(position as i64)
        .bind(track_id.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Delete playlist and its members
///
/// Deleting an id that does not exist is not an error.
pub async fn delete(pool: &SqlitePool, id: PlaylistId) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ?")
        .bind(id.get())
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id.get())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}
