//! Genre and people filters applied to a page of results.

use reelscout_api::tmdb::{TmdbGenre, TmdbMovieSearchResult, TmdbPersonSearchResult};

/// Name of the synthetic genre entry that disables genre filtering.
pub const ALL_GENRES_LABEL: &str = "All";

/// Keeps only movies tagged with `genre_id`.
///
/// An unset or non-positive genre id passes every movie through.
/// The input is never modified.
#[must_use]
pub fn filter_by_genre(
    movies: &[TmdbMovieSearchResult],
    genre_id: Option<i64>,
) -> Vec<TmdbMovieSearchResult> {
    let Some(target) = genre_id
        .filter(|&id| id > 0)
        .and_then(|id| u32::try_from(id).ok())
    else {
        return movies.to_vec();
    };

    movies
        .iter()
        .filter(|m| m.genre_ids.contains(&target))
        .cloned()
        .collect()
}

/// Returns whether a person counts as an actor with a full name:
/// department "acting" (any case) and at least two words in the name.
#[must_use]
pub fn is_named_actor(person: &TmdbPersonSearchResult) -> bool {
    let acting = person
        .known_for_department
        .as_deref()
        .is_some_and(|d| d.eq_ignore_ascii_case("acting"));
    acting && person.name.split_whitespace().nth(1).is_some()
}

/// Restricts people to actors with a multi-word name.
#[must_use]
pub fn restrict_to_actors(people: &[TmdbPersonSearchResult]) -> Vec<TmdbPersonSearchResult> {
    people.iter().filter(|p| is_named_actor(p)).cloned().collect()
}

/// Builds the genre filter choices: the API list prefixed with an
/// `All` entry (id 0) unless the list already starts with one.
#[must_use]
pub fn genre_choices(genres: &[TmdbGenre]) -> Vec<TmdbGenre> {
    let mut choices = Vec::with_capacity(genres.len().saturating_add(1));
    if genres.first().is_none_or(|g| g.name != ALL_GENRES_LABEL) {
        choices.push(TmdbGenre {
            id: 0,
            name: String::from(ALL_GENRES_LABEL),
        });
    }
    choices.extend(genres.iter().cloned());
    choices
}
