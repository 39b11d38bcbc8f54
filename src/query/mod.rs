//! Pure submission query logic
//!
//! Filtering, sorting and autocomplete suggestions over the in-memory
//! submission set. Everything here is a pure function of its inputs so it
//! can be re-invoked on every keystroke (or request) without accumulating
//! state; timing concerns like debouncing belong to callers.

pub mod engine;
pub mod suggest;

pub use engine::{filter_submissions, sort_submissions, visible_submissions};
pub use suggest::{suggest, Suggestion};

use serde::Serialize;
use std::str::FromStr;

/// Which submission field an exact-match filter narrows on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Song,
    Artist,
    Album,
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "song" => Ok(FilterKind::Song),
            "artist" => Ok(FilterKind::Artist),
            "album" => Ok(FilterKind::Album),
            other => Err(format!(
                "Unknown filter type '{}' (expected song, artist or album)",
                other
            )),
        }
    }
}

/// Exact-match narrowing to one specific song/artist/album value
///
/// Distinct from free-text search: the targeted field must equal `value`
/// exactly. `display_name` is what selectors show for the filter chip.
#[derive(Debug, Clone)]
pub struct ActiveFilter {
    pub kind: FilterKind,
    pub value: String,
    pub display_name: String,
}

impl ActiveFilter {
    pub fn new(kind: FilterKind, value: String) -> Self {
        let display_name = value.clone();
        Self {
            kind,
            value,
            display_name,
        }
    }
}

/// Comparator selection for the visible list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    MostRecent,
    MostOld,
    MostLiked,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "most-recent" => Ok(SortOrder::MostRecent),
            "most-old" => Ok(SortOrder::MostOld),
            "most-liked" => Ok(SortOrder::MostLiked),
            other => Err(format!(
                "Unknown sort order '{}' (expected most-recent, most-old or most-liked)",
                other
            )),
        }
    }
}
