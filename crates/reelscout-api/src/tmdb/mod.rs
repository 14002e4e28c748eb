//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints
//! and retrieves genre, movie search, person search and person data.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    SearchMovieParams, SearchPersonParams, TmdbGenre, TmdbGenreList, TmdbKnownFor,
    TmdbMovieCredit, TmdbMovieSearchResult, TmdbPaginated, TmdbPersonDetails,
    TmdbPersonMovieCredits, TmdbPersonSearchResult, TmdbSearchMovieResponse,
    TmdbSearchPersonResponse,
};
