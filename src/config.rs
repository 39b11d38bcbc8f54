//! Configuration resolution for linernotes
//!
//! Settings resolve with priority: command-line argument, environment
//! variable, TOML config file, compiled default. The Spotify credentials
//! have no compiled default and must come from the environment or the
//! config file.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid bind address: {0}")]
    InvalidBind(String),

    #[error("{0}")]
    Missing(String),
}

/// Command-line arguments
///
/// Each flag falls back to its environment variable when absent, so the
/// first two resolution tiers are handled by the parser itself.
#[derive(Parser, Debug, Default)]
#[command(name = "linernotes")]
#[command(about = "Community stories behind songs")]
#[command(version)]
pub struct Args {
    /// Address to listen on, e.g. 127.0.0.1:3000
    #[arg(short, long, env = "LINERNOTES_BIND")]
    pub bind: Option<String>,

    /// Path to the SQLite database file
    #[arg(short, long, env = "LINERNOTES_DATABASE")]
    pub database: Option<PathBuf>,

    /// Market code sent with catalog searches
    #[arg(short, long, env = "LINERNOTES_MARKET")]
    pub market: Option<String>,

    /// Path to the TOML config file
    #[arg(short, long, env = "LINERNOTES_CONFIG")]
    pub config: Option<PathBuf>,
}

/// TOML config file schema
///
/// All fields optional; anything absent falls through to the compiled
/// default (or, for credentials, to a startup error).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bind: Option<String>,
    pub database: Option<PathBuf>,
    pub market: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
}

/// Spotify client-credentials pair
#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub database: PathBuf,
    pub market: String,
    pub credentials: SpotifyCredentials,
}

impl Config {
    /// Resolve the runtime configuration from parsed arguments
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let toml_config = load_toml_config(args.config.as_deref())?;

        // Priority: CLI/ENV (folded into args by clap) -> TOML -> default
        let bind_str = args
            .bind
            .clone()
            .or_else(|| toml_config.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        let database = args
            .database
            .clone()
            .or_else(|| toml_config.database.clone())
            .unwrap_or_else(default_database_path);

        let market = args
            .market
            .clone()
            .or_else(|| toml_config.market.clone())
            .unwrap_or_else(|| DEFAULT_MARKET.to_string());

        let credentials = resolve_spotify_credentials(&toml_config)?;

        Ok(Config {
            bind,
            database,
            market,
            credentials,
        })
    }
}

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_MARKET: &str = "GB";

/// Default database location: `<data_local_dir>/linernotes/linernotes.db`
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("linernotes"))
        .unwrap_or_else(|| PathBuf::from("./linernotes_data"))
        .join("linernotes.db")
}

/// Default config file location: `<config_dir>/linernotes/config.toml`
fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("linernotes"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

/// Load the TOML config file
///
/// A missing file at the default location is not an error (defaults apply).
/// A missing file at an explicitly requested location is.
fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (default_config_path(), false),
    };

    if !path.exists() {
        if required {
            return Err(ConfigError::Missing(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        info!("No config file at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config = toml::from_str(&content)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Resolve the Spotify credentials: ENV -> TOML
///
/// Warns when both sources carry a value (potential misconfiguration),
/// then uses the higher-priority one.
fn resolve_spotify_credentials(
    toml_config: &TomlConfig,
) -> Result<SpotifyCredentials, ConfigError> {
    let env_id = std::env::var("LINERNOTES_SPOTIFY_CLIENT_ID").ok();
    let env_secret = std::env::var("LINERNOTES_SPOTIFY_CLIENT_SECRET").ok();

    let mut sources = Vec::new();
    if env_id.as_deref().is_some_and(is_valid_value) {
        sources.push("environment");
    }
    if toml_config
        .spotify_client_id
        .as_deref()
        .is_some_and(is_valid_value)
    {
        sources.push("TOML");
    }
    if sources.len() > 1 {
        warn!(
            "Spotify credentials found in multiple sources: {}. Using environment (highest priority).",
            sources.join(", ")
        );
    }

    let client_id = env_id
        .filter(|v| is_valid_value(v))
        .or_else(|| {
            toml_config
                .spotify_client_id
                .clone()
                .filter(|v| is_valid_value(v))
        });
    let client_secret = env_secret
        .filter(|v| is_valid_value(v))
        .or_else(|| {
            toml_config
                .spotify_client_secret
                .clone()
                .filter(|v| is_valid_value(v))
        });

    match (client_id, client_secret) {
        (Some(client_id), Some(client_secret)) => {
            info!("Spotify credentials loaded from {}", sources.first().unwrap_or(&"TOML"));
            Ok(SpotifyCredentials {
                client_id,
                client_secret,
            })
        }
        _ => Err(ConfigError::Missing(
            "Spotify credentials not configured. Provide both values using one of:\n\
             1. Environment: LINERNOTES_SPOTIFY_CLIENT_ID / LINERNOTES_SPOTIFY_CLIENT_SECRET\n\
             2. TOML config: ~/.config/linernotes/config.toml (spotify_client_id / spotify_client_secret)\n\
             \n\
             Create credentials at: https://developer.spotify.com/dashboard"
                .to_string(),
        )),
    }
}

/// Validate a configured value (non-empty, non-whitespace)
fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}
