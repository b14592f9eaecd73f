/// Preview and passthrough audio downloads
pub mod audio;
/// Deezer public API client
pub mod deezer;
/// Data entities for playlists, tracks and audio payloads
pub mod entities;
/// Error types and result aliases
pub mod errors;

pub use audio::AudioClient;
pub use deezer::DeezerClient;
