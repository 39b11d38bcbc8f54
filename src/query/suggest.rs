//! Fuzzy autocomplete suggestions
//!
//! Proposes song/artist/album values to filter by, ranked by match quality
//! against a partial query, with popularity (how many submissions share the
//! value) breaking ties.

use super::FilterKind;
use crate::db::submissions::Submission;
use serde::Serialize;
use std::collections::HashMap;

/// Queries shorter than this yield no suggestions
const MIN_QUERY_LEN: usize = 2;
const MAX_SUGGESTIONS: usize = 8;

/// Candidates farther than this from the query are dropped entirely
/// (equivalent to a Jaro-Winkler similarity floor of 0.6)
const MAX_DISTANCE: f64 = 0.4;

/// One autocomplete candidate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: FilterKind,
    pub name: String,
    /// Representative artist for display (songs and albums)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Representative cover art
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_cover: Option<String>,
    /// How many submissions share this value
    pub count: usize,
}

/// Rank up to eight candidate filter values against a partial query
///
/// An empty (or sub-minimum) query yields no suggestions rather than
/// matching everything.
pub fn suggest(all: &[Submission], query: &str) -> Vec<Suggestion> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    // One candidate per distinct (kind, name) pair; the first occurrence
    // supplies the display fields, later ones only bump the count
    let mut candidates: HashMap<(FilterKind, String), Suggestion> = HashMap::new();
    for submission in all {
        add_candidate(
            &mut candidates,
            FilterKind::Song,
            &submission.song_name,
            Some(&submission.artist_name),
            submission.album_cover.as_deref(),
        );
        add_candidate(
            &mut candidates,
            FilterKind::Artist,
            &submission.artist_name,
            None,
            submission.album_cover.as_deref(),
        );
        add_candidate(
            &mut candidates,
            FilterKind::Album,
            &submission.album_name,
            Some(&submission.artist_name),
            submission.album_cover.as_deref(),
        );
    }

    let mut scored: Vec<(f64, Suggestion)> = candidates
        .into_values()
        .filter_map(|candidate| {
            let distance = match_distance(&query, &candidate.name);
            (distance <= MAX_DISTANCE).then_some((distance, candidate))
        })
        .collect();

    // Best match first; popularity breaks ties, then name for determinism
    scored.sort_by(|(dist_a, a), (dist_b, b)| {
        dist_a
            .partial_cmp(dist_b)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.name.cmp(&b.name))
    });
    scored.truncate(MAX_SUGGESTIONS);

    scored.into_iter().map(|(_, suggestion)| suggestion).collect()
}

fn add_candidate(
    candidates: &mut HashMap<(FilterKind, String), Suggestion>,
    kind: FilterKind,
    name: &str,
    artist: Option<&str>,
    album_cover: Option<&str>,
) {
    let entry = candidates
        .entry((kind, name.to_string()))
        .or_insert_with(|| Suggestion {
            kind,
            name: name.to_string(),
            artist: artist.map(|a| a.to_string()),
            album_cover: album_cover.map(|c| c.to_string()),
            count: 0,
        });
    entry.count += 1;
}

/// Tiered distance between a normalized query and a candidate name
///
/// Exact match 0.0, prefix 0.1, substring 0.25; anything else falls back to
/// the Jaro-Winkler complement, which admits minor misspellings.
fn match_distance(query: &str, name: &str) -> f64 {
    let lowered = name.to_lowercase();
    let name = lowered.trim();

    if name == query {
        0.0
    } else if name.starts_with(query) {
        0.1
    } else if name.contains(query) {
        0.25
    } else {
        1.0 - strsim::jaro_winkler(query, name)
    }
}
