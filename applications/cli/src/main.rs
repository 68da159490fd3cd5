/// Hearth - local music library player (command line)
use clap::{Parser, Subcommand, ValueEnum};
use hearth_cli::{build_player, open_playlists, AppConfig, ConsolePort, JsonCatalog};
use hearth_core::{CatalogProvider, PlaylistId, Track, TrackId};
use hearth_playback::{FilterField, PlayMode, PlayerState, SortOption};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Hearth Player music library", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "HEARTH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tracks, optionally filtered and sorted
    Tracks {
        /// Search text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Field the search text is matched against
        #[arg(short, long, value_enum, default_value_t = FieldArg::Title)]
        field: FieldArg,
        /// Ordering
        #[arg(long, value_enum, default_value_t = SortArg::Title)]
        sort: SortArg,
    },
    /// Manage playlists
    Playlists {
        #[command(subcommand)]
        action: PlaylistCommand,
    },
    /// Simulate a listening session and print the selected tracks
    Play {
        /// Play mode
        #[arg(short, long, value_enum, default_value_t = ModeArg::Shuffle)]
        mode: ModeArg,
        /// Number of tracks to select
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
        /// Play from a playlist instead of the whole catalog
        #[arg(short, long)]
        playlist: Option<i64>,
        /// Search text
        #[arg(short, long)]
        search: Option<String>,
        /// Treat tracks whose file is missing as unplayable
        #[arg(long)]
        verify_files: bool,
    },
    /// Play and pause automatically after the given minutes
    Sleep {
        /// Minutes until playback pauses
        minutes: u32,
    },
}

#[derive(Subcommand)]
enum PlaylistCommand {
    /// List all playlists
    List,
    /// Show the tracks of a playlist
    Show {
        /// Playlist id
        id: i64,
    },
    /// Create an empty playlist
    Create {
        /// Playlist title
        title: String,
    },
    /// Append a track to a playlist
    Add {
        /// Playlist id
        id: i64,
        /// Track path as listed in the catalog
        track: String,
    },
    /// Delete a playlist
    Remove {
        /// Playlist id
        id: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Title,
    Artist,
    Album,
}

impl From<FieldArg> for FilterField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Title => FilterField::Title,
            FieldArg::Artist => FilterField::Artist,
            FieldArg::Album => FilterField::Album,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Title,
    TitleDesc,
    Artist,
    Folder,
    Recent,
}

impl From<SortArg> for SortOption {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Title => SortOption::TitleAscending,
            SortArg::TitleDesc => SortOption::TitleDescending,
            SortArg::Artist => SortOption::ArtistAscending,
            SortArg::Folder => SortOption::Folder,
            SortArg::Recent => SortOption::RecentlyAdded,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Shuffle,
    RepeatOne,
    Normal,
}

impl From<ModeArg> for PlayMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Shuffle => PlayMode::Shuffle,
            ModeArg::RepeatOne => PlayMode::RepeatOne,
            ModeArg::Normal => PlayMode::Normal,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hearth_cli=info,hearth_playback=info,hearth_storage=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Tracks {
            search,
            field,
            sort,
        } => {
            config.player.default_filter_field = field.into();
            config.player.default_sort = sort.into();
            list_tracks(&config, &search).await?;
        }
        Commands::Playlists { action } => {
            playlists(&config, action).await?;
        }
        Commands::Play {
            mode,
            count,
            playlist,
            search,
            verify_files,
        } => {
            config.player.default_play_mode = mode.into();
            play(&config, count, playlist, search, verify_files).await?;
        }
        Commands::Sleep { minutes } => {
            sleep(&config, minutes).await?;
        }
    }

    Ok(())
}

async fn list_tracks(config: &AppConfig, search: &str) -> anyhow::Result<()> {
    let player = build_player(config, Arc::new(ConsolePort::new(false))).await?;
    player.search_now(search);

    let snapshot = player.snapshot();
    println!("Tracks ({}):", snapshot.display.len());
    for track in snapshot.display.iter() {
        println!("  {}", describe(track));
    }

    Ok(())
}

async fn playlists(config: &AppConfig, action: PlaylistCommand) -> anyhow::Result<()> {
    let store = open_playlists(config).await?;

    match action {
        PlaylistCommand::List => {
            println!("Playlists:");
            for playlist in store.list().iter() {
                println!(
                    "  {} - {} ({} tracks)",
                    playlist.id,
                    playlist.title,
                    playlist.tracks.len()
                );
            }
        }
        PlaylistCommand::Show { id } => {
            let id = PlaylistId::new(id);
            let playlist = store
                .get(id)
                .ok_or_else(|| anyhow::anyhow!("Playlist {} not found", id))?;
            println!("{}:", playlist.title);
            for (i, track) in playlist.tracks.iter().enumerate() {
                println!("  {:>3}. {}", i + 1, track);
            }
        }
        PlaylistCommand::Create { title } => {
            let id = store.create(&title).await?;
            println!("Created playlist {} - {}", id, title.trim());
        }
        PlaylistCommand::Add { id, track } => {
            let track = JsonCatalog::new(&config.storage.catalog_path)
                .find_track(&TrackId::new(track))?;
            store.add_track(PlaylistId::new(id), track.id.clone()).await?;
            println!("Added {} to playlist {}", describe(&track), id);
        }
        PlaylistCommand::Remove { id } => {
            store.remove(PlaylistId::new(id)).await?;
            println!("Removed playlist {}", id);
        }
    }

    Ok(())
}

async fn play(
    config: &AppConfig,
    count: usize,
    playlist: Option<i64>,
    search: Option<String>,
    verify_files: bool,
) -> anyhow::Result<()> {
    let player = build_player(config, Arc::new(ConsolePort::new(verify_files))).await?;

    if let Some(id) = playlist {
        player.select_playlist(Some(PlaylistId::new(id)))?;
    }
    if let Some(text) = search {
        player.search_now(text);
    }

    let display = player.snapshot().display;
    let Some(first) = display.first() else {
        println!("Nothing to play");
        return Ok(());
    };

    let mut selected = player.select_track(first);
    for i in 0..count {
        match &selected {
            Some(track) => println!("{:>3}. {}", i + 1, describe(track)),
            None => {
                println!("No playable track left");
                break;
            }
        }
        if i + 1 < count {
            selected = player.next();
        }
    }

    Ok(())
}

async fn sleep(config: &AppConfig, minutes: u32) -> anyhow::Result<()> {
    let player = build_player(config, Arc::new(ConsolePort::new(false))).await?;

    let display = player.snapshot().display;
    let Some(first) = display.first() else {
        println!("Nothing to play");
        return Ok(());
    };
    player.select_track(first);
    player.start_sleep_timer(minutes)?;

    let mut timer = player.sleep_timer();
    loop {
        tokio::select! {
            changed = timer.changed() => {
                if changed.is_err() {
                    break;
                }
                match *timer.borrow_and_update() {
                    Some(state) if state.remaining.as_secs() % 60 == 0 => {
                        println!("{} minute(s) left", state.remaining.as_secs() / 60);
                    }
                    Some(_) => {}
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                player.cancel_sleep_timer();
                println!("Sleep timer cancelled");
                break;
            }
        }
    }

    if player.state() == PlayerState::Paused {
        println!("Paused after {} minute(s)", minutes);
    }
    Ok(())
}

fn describe(track: &Track) -> String {
    match &track.artist {
        Some(artist) => format!("{} - {}", artist, track.title),
        None => track.title.clone(),
    }
}
