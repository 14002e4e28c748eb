//! Cached TMDB queries.
//!
//! Every key owns a [`OnceCell`]: concurrent callers asking for the same key
//! share one request, successful results stay cached for the lifetime of
//! the cache, and a failed fetch leaves the cell empty so the next caller
//! retries.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Result, bail};
use reelscout_api::tmdb::{
    SearchMovieParams, SearchPersonParams, TmdbApi, TmdbGenreList, TmdbPaginated,
    TmdbPersonDetails, TmdbPersonMovieCredits, TmdbSearchMovieResponse, TmdbSearchPersonResponse,
};
use tokio::sync::{Mutex, OnceCell};
use tracing::instrument;

/// Kind of entity a search targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `search/movie`.
    #[default]
    Movies,
    /// `search/person`.
    People,
}

impl EntityKind {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::People => "people",
        }
    }

    /// Returns the other kind.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Movies => Self::People,
            Self::People => Self::Movies,
        }
    }
}

impl FromStr for EntityKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "movies" | "movie" => Ok(Self::Movies),
            "people" | "person" => Ok(Self::People),
            other => bail!("invalid entity type: {other} (expected movies or people)"),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache key of a search page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Searched entity.
    pub kind: EntityKind,
    /// Trimmed search term.
    pub term: String,
    /// 1-based page.
    pub page: u32,
}

impl QueryKey {
    /// Builds a key, trimming the term and flooring the page at 1.
    #[must_use]
    pub fn new(kind: EntityKind, term: &str, page: u32) -> Self {
        Self {
            kind,
            term: String::from(term.trim()),
            page: page.max(1),
        }
    }
}

/// Request options shared by every query.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Response language (e.g. `en-US`).
    pub language: String,
    /// Include adult titles and profiles in searches.
    pub include_adult: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            include_adult: false,
        }
    }
}

type Slots<K, T> = Mutex<HashMap<K, Arc<OnceCell<Arc<T>>>>>;

/// Deduplicating, non-evicting cache over a [`TmdbApi`].
#[derive(Debug)]
pub struct QueryCache<A> {
    api: Arc<A>,
    options: QueryOptions,
    genres: OnceCell<Arc<TmdbGenreList>>,
    movies: Slots<QueryKey, TmdbSearchMovieResponse>,
    people: Slots<QueryKey, TmdbSearchPersonResponse>,
    persons: Slots<u64, TmdbPersonDetails>,
    credits: Slots<u64, TmdbPersonMovieCredits>,
}

impl<A: TmdbApi + Sync> QueryCache<A> {
    /// Creates an empty cache.
    pub fn new(api: Arc<A>, options: QueryOptions) -> Self {
        Self {
            api,
            options,
            genres: OnceCell::new(),
            movies: Mutex::new(HashMap::new()),
            people: Mutex::new(HashMap::new()),
            persons: Mutex::new(HashMap::new()),
            credits: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the underlying API.
    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    /// Returns the request options.
    pub const fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Movie genre list.
    ///
    /// # Errors
    ///
    /// Returns the API error when the fetch fails.
    #[instrument(skip_all)]
    pub async fn genres(&self) -> Result<Arc<TmdbGenreList>> {
        let genres = self
            .genres
            .get_or_try_init(|| async {
                self.api
                    .movie_genres(&self.options.language)
                    .await
                    .map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(genres))
    }

    /// One page of movie search results. An empty term yields an empty page
    /// without a request.
    ///
    /// # Errors
    ///
    /// Returns the API error when the fetch fails.
    #[instrument(skip_all, fields(term = term, page = page))]
    pub async fn search_movies(&self, term: &str, page: u32) -> Result<Arc<TmdbSearchMovieResponse>> {
        let key = QueryKey::new(EntityKind::Movies, term, page);
        if key.term.is_empty() {
            return Ok(Arc::new(TmdbPaginated::empty()));
        }
        let params = SearchMovieParams::new(key.term.clone())
            .language(self.options.language.clone())
            .page(key.page)
            .include_adult(self.options.include_adult);
        cached(&self.movies, key, || self.api.search_movie(&params)).await
    }

    /// One page of person search results. An empty term yields an empty
    /// page without a request.
    ///
    /// # Errors
    ///
    /// Returns the API error when the fetch fails.
    #[instrument(skip_all, fields(term = term, page = page))]
    pub async fn search_people(
        &self,
        term: &str,
        page: u32,
    ) -> Result<Arc<TmdbSearchPersonResponse>> {
        let key = QueryKey::new(EntityKind::People, term, page);
        if key.term.is_empty() {
            return Ok(Arc::new(TmdbPaginated::empty()));
        }
        let params = SearchPersonParams::new(key.term.clone())
            .language(self.options.language.clone())
            .page(key.page)
            .include_adult(self.options.include_adult);
        cached(&self.people, key, || self.api.search_person(&params)).await
    }

    /// Person details.
    ///
    /// # Errors
    ///
    /// Returns the API error when the fetch fails.
    #[instrument(skip_all, fields(person_id = person_id))]
    pub async fn person(&self, person_id: u64) -> Result<Arc<TmdbPersonDetails>> {
        cached(&self.persons, person_id, || {
            self.api.person_details(person_id, &self.options.language)
        })
        .await
    }

    /// Movies a person appeared in.
    ///
    /// # Errors
    ///
    /// Returns the API error when the fetch fails.
    #[instrument(skip_all, fields(person_id = person_id))]
    pub async fn person_credits(&self, person_id: u64) -> Result<Arc<TmdbPersonMovieCredits>> {
        cached(&self.credits, person_id, || {
            self.api
                .person_movie_credits(person_id, &self.options.language)
        })
        .await
    }
}

async fn cached<K, T, F, Fut>(slots: &Slots<K, T>, key: K, fetch: F) -> Result<Arc<T>>
where
    K: Eq + Hash,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let cell = {
        let mut slots = slots.lock().await;
        Arc::clone(slots.entry(key).or_default())
    };
    let value = cell
        .get_or_try_init(|| async { fetch().await.map(Arc::new) })
        .await?;
    Ok(Arc::clone(value))
}
