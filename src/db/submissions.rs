//! Submission database operations
//!
//! Like/unlike adjust the counter inside a single UPDATE so concurrent
//! requests can never lose increments to a read-modify-write race, and the
//! unlike clamp happens in SQL (`MAX(likes - 1, 0)`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// A user-authored story tied to one song or album
///
/// Serialized to camelCase on the wire; `songName`/`artistName`/`albumName`
/// are denormalized copies of catalog metadata at submission time and are
/// never re-synced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub song_name: String,
    pub artist_name: String,
    pub album_name: String,
    pub album_cover: Option<String>,
    pub preview_url: Option<String>,
    pub user_text: String,
    pub submitted_by: String,
    pub timestamp: DateTime<Utc>,
    pub likes: i64,
}

impl Submission {
    /// Create a new submission with a fresh id, the current timestamp and
    /// zero likes. A missing or blank `submitted_by` becomes "Anonymous".
    pub fn new(
        song_name: String,
        artist_name: String,
        album_name: String,
        album_cover: Option<String>,
        preview_url: Option<String>,
        user_text: String,
        submitted_by: Option<String>,
    ) -> Self {
        let submitted_by = submitted_by
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "Anonymous".to_string());

        Self {
            id: Uuid::new_v4().to_string(),
            song_name,
            artist_name,
            album_name,
            album_cover,
            preview_url,
            user_text,
            submitted_by,
            timestamp: Utc::now(),
            likes: 0,
        }
    }
}

/// Insert a submission
pub async fn insert_submission(
    pool: &SqlitePool,
    submission: &Submission,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO submissions (
            id, song_name, artist_name, album_name, album_cover,
            preview_url, user_text, submitted_by, timestamp, likes
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&submission.id)
    .bind(&submission.song_name)
    .bind(&submission.artist_name)
    .bind(&submission.album_name)
    .bind(&submission.album_cover)
    .bind(&submission.preview_url)
    .bind(&submission.user_text)
    .bind(&submission.submitted_by)
    .bind(submission.timestamp)
    .bind(submission.likes)
    .execute(pool)
    .await?;

    Ok(())
}

/// List all submissions, newest first
pub async fn list_submissions(pool: &SqlitePool) -> Result<Vec<Submission>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, song_name, artist_name, album_name, album_cover,
               preview_url, user_text, submitted_by, timestamp, likes
        FROM submissions
        ORDER BY timestamp DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| Submission {
            id: row.get("id"),
            song_name: row.get("song_name"),
            artist_name: row.get("artist_name"),
            album_name: row.get("album_name"),
            album_cover: row.get("album_cover"),
            preview_url: row.get("preview_url"),
            user_text: row.get("user_text"),
            submitted_by: row.get("submitted_by"),
            timestamp: row.get("timestamp"),
            likes: row.get("likes"),
        })
        .collect())
}

/// Atomically increment a submission's like counter
///
/// Returns the new count, or None if the id is unknown.
pub async fn like_submission(pool: &SqlitePool, id: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "UPDATE submissions SET likes = likes + 1 WHERE id = ? RETURNING likes",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Atomically decrement a submission's like counter, clamped at zero
///
/// Returns the new count, or None if the id is unknown.
pub async fn unlike_submission(pool: &SqlitePool, id: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "UPDATE submissions SET likes = MAX(likes - 1, 0) WHERE id = ? RETURNING likes",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
