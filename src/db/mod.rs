//! Database access for linernotes

pub mod submissions;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Creates the parent directory and the database file if they do not exist.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Initialize tables if they don't exist
///
/// Public so test harnesses can prepare in-memory databases with the real
/// schema.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            id           TEXT PRIMARY KEY,
            song_name    TEXT NOT NULL,
            artist_name  TEXT NOT NULL,
            album_name   TEXT NOT NULL,
            album_cover  TEXT,
            preview_url  TEXT,
            user_text    TEXT NOT NULL,
            submitted_by TEXT NOT NULL DEFAULT 'Anonymous',
            timestamp    TEXT NOT NULL,
            likes        INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (submissions)");

    Ok(())
}
