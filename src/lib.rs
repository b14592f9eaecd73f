//! Songmore - backend of a song guessing game
//!
//! This library picks a playable track from a Deezer playlist, either at
//! random or reproducibly from a shareable seed, and serves its preview clip
//! with the track metadata carried in response headers.

/// Client modules for the upstream catalogue and audio hosts
pub mod clients;
/// Seeded and system random sources
pub mod random;
/// Bounded rejection sampling over a playlist
pub mod selector;
/// HTTP routes and response assembly
pub mod server;
/// Configuration and request orchestration
pub mod service;
