//! End-to-end tests for the CLI wiring
//!
//! Builds players from configuration against temp-file catalogs and
//! databases.

use hearth_cli::{build_player, open_playlists, AppConfig, ConsolePort, JsonCatalog};
use hearth_core::{CatalogProvider, HearthError, TrackId};
use hearth_playback::{PlayMode, PlayerState};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write_catalog(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("catalog.json");
    std::fs::write(
        &path,
        r#"[
            {"id": "/music/jazz/so-what.mp3", "title": "So What", "artist": "Miles Davis"},
            {"id": "/music/rock/paranoid.mp3", "title": "Paranoid", "artist": "Black Sabbath"},
            {"id": "/music/rock/heroes.mp3", "title": "Heroes", "artist": "David Bowie"}
        ]"#,
    )
    .unwrap();
    path
}

fn config(dir: &TempDir, database_url: String) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.catalog_path = write_catalog(dir.path());
    config.storage.database_url = database_url;
    config.player.default_play_mode = PlayMode::Normal;
    config
}

#[tokio::test]
async fn player_plays_catalog_in_order() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, String::new());

    let player = build_player(&config, Arc::new(ConsolePort::new(false)))
        .await
        .unwrap();
    let display = player.snapshot().display;
    let titles: Vec<&str> = display.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Heroes", "Paranoid", "So What"]);

    player.select_track(&display[0]);
    assert_eq!(player.next().map(|t| t.title), Some("Paranoid".to_string()));
    assert_eq!(player.state(), PlayerState::Playing);
}

#[tokio::test]
async fn missing_files_are_skipped_until_idle() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, String::new());

    let player = build_player(&config, Arc::new(ConsolePort::new(true)))
        .await
        .unwrap();
    let first = player.snapshot().display[0].clone();

    assert_eq!(player.select_track(&first), None);
    assert_eq!(player.state(), PlayerState::Idle);
}

#[tokio::test]
async fn sqlite_playlists_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("hearth.db").display());
    let config = config(&dir, url);

    let store = open_playlists(&config).await.unwrap();
    let id = store.create("Evening").await.unwrap();
    store
        .add_track(id, TrackId::new("/music/rock/heroes.mp3"))
        .await
        .unwrap();
    drop(store);

    let player = build_player(&config, Arc::new(ConsolePort::new(false)))
        .await
        .unwrap();
    player.select_playlist(Some(id)).unwrap();

    let snapshot = player.snapshot();
    assert!(snapshot.playlist_active());
    assert_eq!(snapshot.display.len(), 1);
    assert_eq!(snapshot.display[0].title, "Heroes");
}

#[test]
fn catalog_lookup_rejects_unknown_paths() {
    let dir = TempDir::new().unwrap();
    let catalog = JsonCatalog::new(write_catalog(dir.path()));

    let track = catalog
        .find_track(&TrackId::new("/music/rock/heroes.mp3"))
        .unwrap();
    assert_eq!(track.title, "Heroes");

    let err = catalog
        .find_track(&TrackId::new("/music/rock/missing.mp3"))
        .unwrap_err();
    assert!(matches!(err, HearthError::TrackNotFound(_)));
}
