//! Browse and autocomplete endpoints
//!
//! Server-side face of the query engine: a combined
//! filter/search/sort view and fuzzy suggestions for the filter
//! dropdown. Both recompute from the full submission set per request.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::submissions::Submission;
use crate::error::{ApiError, ApiResult};
use crate::query::{suggest, visible_submissions, ActiveFilter, FilterKind, SortOrder, Suggestion};
use crate::AppState;

/// Query parameters for GET /api/submissions/browse
#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    /// Free-text query; secondary query when a filter is active
    pub q: Option<String>,
    /// Sort order: most-recent (default), most-old or most-liked
    pub sort: Option<String>,
    /// Exact-match filter field: song, artist or album
    pub filter_type: Option<String>,
    /// Exact-match filter value; required when filter_type is given
    pub filter_value: Option<String>,
}

/// Query parameters for GET /api/submissions/suggest
#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub q: Option<String>,
}

/// GET /api/submissions/browse?q=&sort=&filter_type=&filter_value=
///
/// Returns the visible ordered subset for the given query, filter and
/// sort state. 400 on unknown sort/filter values or when only one half
/// of the filter pair is supplied.
async fn browse_submissions(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> ApiResult<Json<Vec<Submission>>> {
    let query = params.q.unwrap_or_default();

    let sort = match params.sort.as_deref() {
        Some(value) => value.parse::<SortOrder>().map_err(ApiError::BadRequest)?,
        None => SortOrder::default(),
    };

    let active_filter = parse_filter(params.filter_type, params.filter_value)?;

    let all = crate::db::submissions::list_submissions(&state.db).await?;
    let visible = visible_submissions(&all, &query, active_filter.as_ref(), sort);

    Ok(Json(visible))
}

/// GET /api/submissions/suggest?q=<partial>
///
/// Fuzzy autocomplete suggestions for the filter dropdown. A missing or
/// too-short query yields an empty list rather than an error.
async fn suggest_filters(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> ApiResult<Json<Vec<Suggestion>>> {
    let query = params.q.unwrap_or_default();

    let all = crate::db::submissions::list_submissions(&state.db).await?;
    Ok(Json(suggest(&all, &query)))
}

/// Both halves of the filter pair or neither.
fn parse_filter(
    filter_type: Option<String>,
    filter_value: Option<String>,
) -> ApiResult<Option<ActiveFilter>> {
    match (filter_type, filter_value) {
        (None, None) => Ok(None),
        (Some(kind), Some(value)) => {
            let kind = kind.parse::<FilterKind>().map_err(ApiError::BadRequest)?;
            Ok(Some(ActiveFilter::new(kind, value)))
        }
        (Some(_), None) => Err(ApiError::BadRequest(
            "filter_value is required when filter_type is given".to_string(),
        )),
        (None, Some(_)) => Err(ApiError::BadRequest(
            "filter_type is required when filter_value is given".to_string(),
        )),
    }
}

/// Build browse and autocomplete routes
pub fn browse_routes() -> Router<AppState> {
    Router::new()
        .route("/api/submissions/browse", get(browse_submissions))
        .route("/api/submissions/suggest", get(suggest_filters))
}
