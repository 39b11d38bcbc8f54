//! Submission endpoints
//!
//! Create/list surface over the submissions store, the like/unlike
//! counter, and a server-side free-text search.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::submissions::Submission;
use crate::error::{ApiError, ApiResult};
use crate::query::filter_submissions;
use crate::AppState;

/// Request body for POST /api/submissions
///
/// All fields optional at the serde level so missing-field errors are
/// reported per field instead of as a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmission {
    pub song_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub album_cover: Option<String>,
    pub preview_url: Option<String>,
    pub user_text: Option<String>,
    pub submitted_by: Option<String>,
}

/// Response body for like/unlike
#[derive(Debug, Serialize)]
pub struct LikesResponse {
    pub likes: i64,
}

/// Query parameters for GET /api/submissions/search
#[derive(Debug, Deserialize)]
pub struct SubmissionSearchParams {
    pub q: Option<String>,
}

/// GET /api/submissions
///
/// Full list of submissions, newest first.
async fn list_submissions(State(state): State<AppState>) -> ApiResult<Json<Vec<Submission>>> {
    let all = crate::db::submissions::list_submissions(&state.db).await?;
    Ok(Json(all))
}

/// POST /api/submissions
///
/// Creates a submission. 400 with a field-level message if any required
/// field is missing, 201 with the stored record on success.
async fn create_submission(
    State(state): State<AppState>,
    Json(body): Json<CreateSubmission>,
) -> ApiResult<(StatusCode, Json<Submission>)> {
    let song_name = require_field(body.song_name, "songName")?;
    let artist_name = require_field(body.artist_name, "artistName")?;
    let album_name = require_field(body.album_name, "albumName")?;
    let user_text = require_field(body.user_text, "userText")?;

    let submission = Submission::new(
        song_name,
        artist_name,
        album_name,
        body.album_cover,
        body.preview_url,
        user_text,
        body.submitted_by,
    );
    crate::db::submissions::insert_submission(&state.db, &submission).await?;

    tracing::info!(
        id = %submission.id,
        song = %submission.song_name,
        artist = %submission.artist_name,
        "Submission created"
    );

    Ok((StatusCode::CREATED, Json(submission)))
}

/// POST /api/submissions/:id/like
async fn like_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LikesResponse>> {
    let likes = crate::db::submissions::like_submission(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    Ok(Json(LikesResponse { likes }))
}

/// POST /api/submissions/:id/unlike
///
/// Decrements the counter without going below zero.
async fn unlike_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LikesResponse>> {
    let likes = crate::db::submissions::unlike_submission(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    Ok(Json(LikesResponse { likes }))
}

/// GET /api/submissions/search?q=<text>
///
/// Case-insensitive substring search across song, artist, album, story
/// text and submitter name. 400 if `q` is missing or blank.
async fn search_submissions(
    State(state): State<AppState>,
    Query(params): Query<SubmissionSearchParams>,
) -> ApiResult<Json<Vec<Submission>>> {
    let query = params.q.as_deref().map(str::trim).unwrap_or("");
    if query.is_empty() {
        return Err(ApiError::BadRequest(
            "Query parameter is required".to_string(),
        ));
    }

    let all = crate::db::submissions::list_submissions(&state.db).await?;
    Ok(Json(filter_submissions(&all, query, None)))
}

fn require_field(value: Option<String>, name: &str) -> ApiResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::BadRequest(format!(
            "Missing required field: {name}"
        ))),
    }
}

/// Build submission routes
pub fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/api/submissions", get(list_submissions).post(create_submission))
        .route("/api/submissions/search", get(search_submissions))
        .route("/api/submissions/:id/like", post(like_submission))
        .route("/api/submissions/:id/unlike", post(unlike_submission))
}
