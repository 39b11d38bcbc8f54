//! HTTP API handlers for linernotes
//!
//! Each submodule owns one slice of the surface and exposes a
//! `*_routes()` builder that the top-level router merges.

pub mod browse;
pub mod health;
pub mod search;
pub mod submissions;

pub use browse::browse_routes;
pub use health::health_routes;
pub use search::search_routes;
pub use submissions::submission_routes;
