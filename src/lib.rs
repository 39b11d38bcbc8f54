//! linernotes library interface
//!
//! Exposes the application state, router and core modules for
//! integration testing and the seed tool.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod query;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::SpotifyClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Catalog client holding the process-wide token cache
    pub spotify: Arc<SpotifyClient>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, spotify: Arc<SpotifyClient>) -> Self {
        Self {
            db,
            spotify,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::search_routes())
        .merge(api::submission_routes())
        .merge(api::browse_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
