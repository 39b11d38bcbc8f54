//! Seed tool: populate the submissions store from a JSON file
//!
//! Each entry pairs a free-text catalog query with the story to attach.
//! The first matching track supplies the song metadata, so entries stay
//! short ("Wonderwall Oasis") while the stored submissions carry full
//! names, cover art and preview URLs.
//!
//! Entry format:
//! `[{"query": "...", "story": "...", "submittedBy": "...", "likes": 5}, ...]`
//! with `submittedBy` and `likes` optional.

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linernotes::config::{Args, Config};
use linernotes::db::submissions::{insert_submission, Submission};
use linernotes::services::SpotifyClient;

/// Command-line arguments for the seed tool
#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "Seed the linernotes submissions store from a JSON file")]
#[command(version)]
struct SeedArgs {
    /// JSON file of seed entries
    #[arg(short, long)]
    file: PathBuf,

    /// Path to the SQLite database file
    #[arg(short, long, env = "LINERNOTES_DATABASE")]
    database: Option<PathBuf>,

    /// Market code sent with catalog searches
    #[arg(short, long, env = "LINERNOTES_MARKET")]
    market: Option<String>,

    /// Path to the TOML config file
    #[arg(short, long, env = "LINERNOTES_CONFIG")]
    config: Option<PathBuf>,
}

/// One seed entry
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedEntry {
    /// Free-text catalog query, e.g. "Landslide Fleetwood Mac"
    query: String,
    /// Story text to attach to the first matching track
    story: String,
    /// Display name; "Anonymous" when absent
    submitted_by: Option<String>,
    /// Like count; random 0..15 when absent
    likes: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,linernotes=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let seed_args = SeedArgs::parse();

    let content = std::fs::read_to_string(&seed_args.file)
        .with_context(|| format!("Failed to read {}", seed_args.file.display()))?;
    let entries: Vec<SeedEntry> =
        serde_json::from_str(&content).context("Failed to parse seed file")?;
    info!("Loaded {} seed entries", entries.len());

    // Reuse the server's resolution chain for database, market and credentials
    let args = Args {
        database: seed_args.database,
        market: seed_args.market,
        config: seed_args.config,
        ..Args::default()
    };
    let config = Config::resolve(&args)?;

    let db = linernotes::db::init_database_pool(&config.database)
        .await
        .context("Failed to initialize database")?;
    let spotify = SpotifyClient::new(config.credentials, config.market)
        .context("Failed to build Spotify client")?;

    let mut added = 0usize;
    let mut skipped = 0usize;

    for entry in &entries {
        match seed_entry(&db, &spotify, entry).await {
            Ok(Some(description)) => {
                info!("Added: {}", description);
                added += 1;
            }
            Ok(None) => {
                warn!("No track found for '{}', skipping", entry.query);
                skipped += 1;
            }
            Err(err) => {
                warn!("Failed to seed '{}': {}", entry.query, err);
                skipped += 1;
            }
        }

        // Pace outbound catalog calls
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    info!("Seeding complete: {} added, {} skipped", added, skipped);
    Ok(())
}

/// Seed one entry; Ok(None) means the catalog had no matching track.
async fn seed_entry(
    db: &SqlitePool,
    spotify: &SpotifyClient,
    entry: &SeedEntry,
) -> Result<Option<String>> {
    let response = spotify.search(&entry.query, 1).await?;
    let track = match response.tracks.and_then(|page| page.items.into_iter().next()) {
        Some(track) => track,
        None => return Ok(None),
    };

    let artist_names = track
        .artists
        .iter()
        .map(|artist| artist.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let album_cover = track.album.images.first().map(|image| image.url.clone());

    let mut submission = Submission::new(
        track.name.clone(),
        artist_names,
        track.album.name.clone(),
        album_cover,
        track.preview_url.clone(),
        entry.story.clone(),
        entry.submitted_by.clone(),
    );
    submission.likes = entry
        .likes
        .unwrap_or_else(|| rand::thread_rng().gen_range(0..15));

    insert_submission(db, &submission).await?;

    Ok(Some(format!(
        "{} by {}",
        submission.song_name, submission.artist_name
    )))
}
