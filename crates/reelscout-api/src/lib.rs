//! API client library for reelscout.
//!
//! Provides the client for the TMDB v3 API.

/// TMDB API client.
pub mod tmdb;
