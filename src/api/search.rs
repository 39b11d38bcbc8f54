//! Catalog search endpoints
//!
//! Proxies free-text queries to the Spotify Web API so client code never
//! handles credentials, and reshapes the two-section response into a
//! single tagged result list.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::services::spotify_client::{SpotifyAlbum, SpotifyTrack};
use crate::AppState;

/// Result count used when the caller omits `limit`
const DEFAULT_LIMIT: u32 = 10;

/// Query parameters for GET /api/search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Free-text query (required)
    pub q: Option<String>,
    /// Maximum number of results to return
    pub limit: Option<u32>,
}

/// One search result, discriminated by media type.
///
/// Serializes as the underlying Spotify object with an added
/// `"type": "track"` or `"type": "album"` field.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchItem {
    Track(SpotifyTrack),
    Album(SpotifyAlbum),
}

/// GET /api/search?q=<text>&limit=<n>
///
/// Returns tracks and albums interleaved into one list, truncated to
/// `limit` (default 10). 400 if `q` is missing or blank.
async fn catalog_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<SearchItem>>> {
    let query = params.q.as_deref().map(str::trim).unwrap_or("");
    if query.is_empty() {
        return Err(ApiError::BadRequest(
            "Query parameter is required".to_string(),
        ));
    }
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    tracing::debug!(query = %query, limit = limit, "Catalog search");

    let response = state.spotify.search(query, limit).await?;

    let tracks = response.tracks.map(|page| page.items).unwrap_or_default();
    let albums = response.albums.map(|page| page.items).unwrap_or_default();

    Ok(Json(interleave_results(tracks, albums, limit as usize)))
}

/// GET /api/track/:id
///
/// Looks up a single track by Spotify id.
async fn track_lookup(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> ApiResult<Json<SpotifyTrack>> {
    let track = state.spotify.track(&track_id).await?;
    Ok(Json(track))
}

/// Alternate tracks and albums positionally (track 0, album 0, track 1,
/// album 1, ...) so both media types are represented after truncation to
/// `limit`. A straight concatenation would let whichever section came
/// first crowd out the other.
fn interleave_results(
    tracks: Vec<SpotifyTrack>,
    albums: Vec<SpotifyAlbum>,
    limit: usize,
) -> Vec<SearchItem> {
    let mut results = Vec::with_capacity(tracks.len() + albums.len());
    let mut tracks = tracks.into_iter();
    let mut albums = albums.into_iter();

    loop {
        let track = tracks.next();
        let album = albums.next();
        if track.is_none() && album.is_none() {
            break;
        }
        if let Some(track) = track {
            results.push(SearchItem::Track(track));
        }
        if let Some(album) = album {
            results.push(SearchItem::Album(album));
        }
    }

    results.truncate(limit);
    results
}

/// Build catalog search routes
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(catalog_search))
        .route("/api/track/:id", get(track_lookup))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str) -> SpotifyTrack {
        SpotifyTrack {
            id: format!("track-{name}"),
            name: name.to_string(),
            artists: Vec::new(),
            album: album("Some Album"),
            duration_ms: Some(200_000),
            preview_url: None,
        }
    }

    fn album(name: &str) -> SpotifyAlbum {
        SpotifyAlbum {
            id: format!("album-{name}"),
            name: name.to_string(),
            artists: Vec::new(),
            images: Vec::new(),
            release_date: None,
        }
    }

    fn names(items: &[SearchItem]) -> Vec<(&'static str, String)> {
        items
            .iter()
            .map(|item| match item {
                SearchItem::Track(t) => ("track", t.name.clone()),
                SearchItem::Album(a) => ("album", a.name.clone()),
            })
            .collect()
    }

    #[test]
    fn test_interleave_exhausts_shorter_side() {
        // Three tracks, one album, limit 4: the album list runs out
        // after one pick and the tracks fill the remaining slots.
        let tracks = vec![track("T0"), track("T1"), track("T2")];
        let albums = vec![album("A0")];

        let results = interleave_results(tracks, albums, 4);

        assert_eq!(
            names(&results),
            vec![
                ("track", "T0".to_string()),
                ("album", "A0".to_string()),
                ("track", "T1".to_string()),
                ("track", "T2".to_string()),
            ]
        );
    }

    #[test]
    fn test_interleave_alternates_and_truncates() {
        let tracks = vec![track("T0"), track("T1"), track("T2")];
        let albums = vec![album("A0"), album("A1"), album("A2")];

        let results = interleave_results(tracks, albums, 4);

        assert_eq!(
            names(&results),
            vec![
                ("track", "T0".to_string()),
                ("album", "A0".to_string()),
                ("track", "T1".to_string()),
                ("album", "A1".to_string()),
            ]
        );
    }

    #[test]
    fn test_interleave_empty_inputs() {
        let results = interleave_results(Vec::new(), Vec::new(), 10);
        assert!(results.is_empty());

        let results = interleave_results(Vec::new(), vec![album("A0")], 10);
        assert_eq!(names(&results), vec![("album", "A0".to_string())]);
    }

    #[test]
    fn test_search_item_carries_type_tag() {
        let item = SearchItem::Track(track("Yesterday"));
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["type"], "track");
        assert_eq!(value["name"], "Yesterday");

        let item = SearchItem::Album(album("Help!"));
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["type"], "album");
        assert_eq!(value["name"], "Help!");
    }
}
