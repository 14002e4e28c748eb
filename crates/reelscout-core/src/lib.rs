//! Core logic for reelscout.
//!
//! Everything between the TMDB client and the terminal: the query cache,
//! the filter/sort pipeline over result pages, the age enrichment loader
//! for people searches, the search session state and the locally
//! persisted favorites, reviews and playlists.

/// Person age computation and the batched age loader.
pub mod age;
/// Genre and people filters.
pub mod filter;
/// Cached, deduplicated TMDB queries.
pub mod query;
/// Search page state.
pub mod session;
/// Sort keys and result ordering.
pub mod sort;
/// Pluggable key/value storage.
pub mod storage;
/// Favorites, reviews and playlists.
pub mod store;

#[cfg(test)]
pub(crate) mod mock;

pub use age::{
    AgeCache, AgeLoader, AgeMap, CancellationToken, DEFAULT_AGE_BATCH_SIZE, age_from_birthday,
};
pub use filter::{filter_by_genre, genre_choices, restrict_to_actors};
pub use query::{EntityKind, QueryCache, QueryKey, QueryOptions};
pub use session::SearchSession;
pub use sort::{
    MovieSortKey, PersonSortKey, SortOrder, apply_movie_pipeline, apply_people_pipeline,
    sort_movies, sort_people,
};
pub use storage::{LocalStorage, MemoryStorage};
pub use store::{MoviesStore, Playlist};
