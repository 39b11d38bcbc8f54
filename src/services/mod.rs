//! External service clients

pub mod spotify_client;

pub use spotify_client::{SpotifyClient, SpotifyError};
