//! Spotify Web API client
//!
//! Client-credentials authentication with a cached bearer token. The cache
//! lock is held across the token exchange, so concurrent callers hitting an
//! expired token trigger exactly one refresh and share its result.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::SpotifyCredentials;

const SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com/api/token";
const SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = "linernotes/0.1.0 (https://github.com/linernotes/linernotes)";

/// Tokens are refreshed this many seconds before their upstream expiry so a
/// token never expires while a request carrying it is in flight.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 300;

/// Spotify client errors
#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("Failed to get access token: {0}")]
    Auth(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Failed to get track: {0}")]
    Track(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Search endpoint response
///
/// Spotify omits whole sections when a type was not requested, hence the
/// options.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<Paging<SpotifyTrack>>,
    pub albums: Option<Paging<SpotifyAlbum>>,
}

/// One page of search results
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
}

/// Spotify track object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyTrack {
    /// Spotify track id
    pub id: String,
    /// Track title
    pub name: String,
    /// Credited artists
    pub artists: Vec<SpotifyArtist>,
    /// Album the track appears on
    pub album: SpotifyAlbum,
    /// Track length in milliseconds
    pub duration_ms: Option<u64>,
    /// 30-second preview clip URL, when Spotify provides one
    pub preview_url: Option<String>,
}

/// Spotify album object (simplified form as returned by search)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyAlbum {
    /// Spotify album id
    pub id: String,
    /// Album title
    pub name: String,
    /// Credited artists (absent on some embedded album objects)
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    /// Cover art, largest first
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
    /// Release date, precision varies (year or full date)
    pub release_date: Option<String>,
}

/// Spotify artist object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyArtist {
    pub id: Option<String>,
    pub name: String,
}

/// Album cover image
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyImage {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// Cached bearer token with its absolute expiry
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    credentials: SpotifyCredentials,
    market: String,
    cached_token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(credentials: SpotifyCredentials, market: String) -> Result<Self, SpotifyError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            credentials,
            market,
            cached_token: Mutex::new(None),
        })
    }

    /// Return a valid bearer token, exchanging credentials if the cached one
    /// is missing or expired
    async fn token(&self) -> Result<String, SpotifyError> {
        // Lock held across the exchange: single-flight refresh
        let mut cached = self.cached_token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_valid(Instant::now()) {
                tracing::debug!("Reusing cached Spotify access token");
                return Ok(token.access_token.clone());
            }
        }

        tracing::debug!("Requesting new Spotify access token");
        let response = self.request_token().await?;
        let expires_at = Instant::now() + token_lifetime(response.expires_in);

        let access_token = response.access_token.clone();
        *cached = Some(CachedToken {
            access_token: response.access_token,
            expires_at,
        });

        tracing::info!(
            expires_in = response.expires_in,
            "Obtained new Spotify access token"
        );

        Ok(access_token)
    }

    /// Client-credentials exchange against the accounts endpoint
    async fn request_token(&self) -> Result<TokenResponse, SpotifyError> {
        let encoded = encode_credentials(
            &self.credentials.client_id,
            &self.credentials.client_secret,
        );

        let response = self
            .http_client
            .post(SPOTIFY_ACCOUNTS_URL)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {}", encoded))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpotifyError::Auth(status_text(status)));
        }

        response
            .json()
            .await
            .map_err(|e| SpotifyError::Parse(e.to_string()))
    }

    /// Search the catalog for tracks and albums matching a free-text query
    pub async fn search(&self, query: &str, limit: u32) -> Result<SearchResponse, SpotifyError> {
        let token = self.token().await?;
        let limit_str = limit.to_string();

        tracing::debug!(query = %query, limit = limit, "Searching Spotify catalog");

        let response = self
            .http_client
            .get(format!("{}/search", SPOTIFY_API_BASE_URL))
            .bearer_auth(&token)
            .query(&[
                ("q", query),
                ("type", "track,album"),
                ("limit", limit_str.as_str()),
                ("market", self.market.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpotifyError::Search(status_text(status)));
        }

        response
            .json()
            .await
            .map_err(|e| SpotifyError::Parse(e.to_string()))
    }

    /// Look up a single track by its Spotify id
    pub async fn track(&self, track_id: &str) -> Result<SpotifyTrack, SpotifyError> {
        let token = self.token().await?;

        tracing::debug!(track_id = %track_id, "Fetching track from Spotify");

        let response = self
            .http_client
            .get(format!("{}/tracks/{}", SPOTIFY_API_BASE_URL, track_id))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpotifyError::Track(status_text(status)));
        }

        response
            .json()
            .await
            .map_err(|e| SpotifyError::Parse(e.to_string()))
    }
}

/// Basic-auth credential string: base64 of `client_id:client_secret`
fn encode_credentials(client_id: &str, client_secret: &str) -> String {
    BASE64.encode(format!("{}:{}", client_id, client_secret))
}

/// Cache lifetime for a token: upstream expiry minus the safety margin
fn token_lifetime(expires_in: u64) -> Duration {
    Duration::from_secs(expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS))
}

/// Human-readable status for upstream error messages
fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(|reason| reason.to_string())
        .unwrap_or_else(|| status.as_u16().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> SpotifyClient {
        SpotifyClient::new(
            SpotifyCredentials {
                client_id: "test-id".to_string(),
                client_secret: "test-secret".to_string(),
            },
            "GB".to_string(),
        )
        .expect("Failed to create client")
    }

    #[test]
    fn test_encode_credentials() {
        // base64("id:secret")
        assert_eq!(encode_credentials("id", "secret"), "aWQ6c2VjcmV0");
    }

    #[test]
    fn test_token_lifetime_applies_safety_margin() {
        assert_eq!(token_lifetime(3600), Duration::from_secs(3300));
        assert_eq!(token_lifetime(301), Duration::from_secs(1));
        // Shorter than the margin: expires immediately rather than underflowing
        assert_eq!(token_lifetime(300), Duration::ZERO);
        assert_eq!(token_lifetime(100), Duration::ZERO);
    }

    #[test]
    fn test_cached_token_validity_window() {
        let now = Instant::now();
        let token = CachedToken {
            access_token: "abc".to_string(),
            expires_at: now + Duration::from_secs(10),
        };

        assert!(token.is_valid(now));
        assert!(token.is_valid(now + Duration::from_secs(9)));
        // The expiry instant itself is already invalid
        assert!(!token.is_valid(now + Duration::from_secs(10)));
        assert!(!token.is_valid(now + Duration::from_secs(11)));
    }

    #[tokio::test]
    async fn test_valid_cached_token_is_reused_without_exchange() {
        let client = test_client();
        *client.cached_token.lock().await = Some(CachedToken {
            access_token: "cached-token".to_string(),
            expires_at: Instant::now() + Duration::from_secs(3300),
        });

        // No network involved: both calls return the cached value
        let first = client.token().await.unwrap();
        let second = client.token().await.unwrap();
        assert_eq!(first, "cached-token");
        assert_eq!(second, "cached-token");
    }

    #[test]
    fn test_search_response_parse() {
        let body = r#"{
            "tracks": {
                "items": [{
                    "id": "t1",
                    "name": "Yesterday",
                    "artists": [{"id": "a1", "name": "The Beatles"}],
                    "album": {
                        "id": "al1",
                        "name": "Help!",
                        "images": [{"url": "https://img/cover.jpg", "height": 640, "width": 640}],
                        "release_date": "1965-08-06"
                    },
                    "duration_ms": 125666,
                    "preview_url": null
                }]
            },
            "albums": {
                "items": [{
                    "id": "al2",
                    "name": "Abbey Road",
                    "artists": [{"id": "a1", "name": "The Beatles"}],
                    "images": []
                }]
            }
        }"#;

        let parsed: SearchResponse = serde_json::from_str(body).unwrap();

        let tracks = parsed.tracks.unwrap();
        assert_eq!(tracks.items.len(), 1);
        assert_eq!(tracks.items[0].name, "Yesterday");
        assert_eq!(tracks.items[0].artists[0].name, "The Beatles");
        assert_eq!(tracks.items[0].album.images[0].url, "https://img/cover.jpg");
        assert_eq!(tracks.items[0].preview_url, None);

        let albums = parsed.albums.unwrap();
        assert_eq!(albums.items.len(), 1);
        assert_eq!(albums.items[0].release_date, None);
    }

    #[test]
    fn test_search_response_parse_with_missing_sections() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"tracks": {"items": []}}"#).unwrap();
        assert!(parsed.tracks.is_some());
        assert!(parsed.albums.is_none());
    }

    #[test]
    fn test_token_response_parse() {
        let body = r#"{"access_token": "BQDtoken", "token_type": "Bearer", "expires_in": 3600}"#;
        let parsed: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.access_token, "BQDtoken");
        assert_eq!(parsed.expires_in, 3600);
    }
}
