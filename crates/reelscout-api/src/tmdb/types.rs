//! TMDB API response types and search parameters.

use serde::Deserialize;

// --- Paginated envelope ---

/// Paginated response envelope shared by the `search/*` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPaginated<T> {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Results on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

impl<T> TmdbPaginated<T> {
    /// Returns an empty first page, used when a query is disabled.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

impl<T> Default for TmdbPaginated<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Response from `search/movie` endpoint.
pub type TmdbSearchMovieResponse = TmdbPaginated<TmdbMovieSearchResult>;

/// Response from `search/person` endpoint.
pub type TmdbSearchPersonResponse = TmdbPaginated<TmdbPersonSearchResult>;

// --- Genres ---

/// Response from `genre/movie/list` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbGenreList {
    /// Genre entries.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

/// Genre entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Search Movie ---

/// A single movie search result.
///
/// Numeric fields missing from the payload deserialize as zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TmdbMovieSearchResult {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD, empty or null).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
}

// --- Search Person ---

/// A single person search result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TmdbPersonSearchResult {
    /// TMDB person ID.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Department the person is best known for (e.g., "Acting").
    #[serde(default)]
    pub known_for_department: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Titles the person is known for.
    #[serde(default)]
    pub known_for: Vec<TmdbKnownFor>,
}

/// Minimal movie/TV reference inside `known_for`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TmdbKnownFor {
    /// TMDB ID of the referenced movie or show.
    pub id: u64,
    /// `movie` or `tv`.
    #[serde(default)]
    pub media_type: Option<String>,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// TV show name.
    #[serde(default)]
    pub name: Option<String>,
}

impl TmdbKnownFor {
    /// Returns the title for movies or the name for shows.
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .filter(|t| !t.is_empty())
    }
}

// --- Person Details ---

/// Response from `person/{person_id}` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TmdbPersonDetails {
    /// TMDB person ID.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Birthday (YYYY-MM-DD or null).
    #[serde(default)]
    pub birthday: Option<String>,
    /// Day of death (YYYY-MM-DD or null).
    #[serde(default)]
    pub deathday: Option<String>,
    /// Place of birth.
    #[serde(default)]
    pub place_of_birth: Option<String>,
    /// Biography text.
    #[serde(default)]
    pub biography: Option<String>,
    /// Department the person is best known for.
    #[serde(default)]
    pub known_for_department: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Alternative names.
    #[serde(default)]
    pub also_known_as: Vec<String>,
}

// --- Person Movie Credits ---

/// Response from `person/{person_id}/movie_credits` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbPersonMovieCredits {
    /// TMDB person ID.
    #[serde(default)]
    pub id: u64,
    /// Movies the person appeared in.
    #[serde(default)]
    pub cast: Vec<TmdbMovieCredit>,
}

/// A cast credit: the movie plus the role played.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TmdbMovieCredit {
    /// The credited movie.
    #[serde(flatten)]
    pub movie: TmdbMovieSearchResult,
    /// Character name.
    #[serde(default)]
    pub character: Option<String>,
    /// TMDB credit ID.
    #[serde(default)]
    pub credit_id: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

// --- Search Parameters ---

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets whether adult titles are included.
    #[must_use]
    pub const fn include_adult(mut self, include_adult: bool) -> Self {
        self.include_adult = include_adult;
        self
    }
}

/// Parameters for `search/person` endpoint.
#[derive(Debug, Clone)]
pub struct SearchPersonParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Include adult profiles.
    pub include_adult: bool,
}

impl SearchPersonParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets whether adult profiles are included.
    #[must_use]
    pub const fn include_adult(mut self, include_adult: bool) -> Self {
        self.include_adult = include_adult;
        self
    }
}
