//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    SearchMovieParams, SearchPersonParams, TmdbGenreList, TmdbPersonDetails,
    TmdbPersonMovieCredits, TmdbSearchMovieResponse, TmdbSearchPersonResponse,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait;
/// implement `TmdbApi` to get `LocalTmdbApi` for free.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the official movie genre list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_genres(&self, language: &str) -> Result<TmdbGenreList>;

    /// Searches for movies by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbSearchMovieResponse>;

    /// Searches for people by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_person(&self, params: &SearchPersonParams)
    -> Result<TmdbSearchPersonResponse>;

    /// Fetches person details (birthday, biography, ...).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn person_details(&self, person_id: u64, language: &str) -> Result<TmdbPersonDetails>;

    /// Fetches the movies a person appeared in.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn person_movie_credits(
        &self,
        person_id: u64,
        language: &str,
    ) -> Result<TmdbPersonMovieCredits>;
}
