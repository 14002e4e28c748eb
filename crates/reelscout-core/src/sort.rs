//! Sort keys and the result ordering pipeline.
//!
//! Every function copies its input and sorts the copy with a stable sort,
//! so equal elements keep their page order in both directions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::NaiveDate;
use reelscout_api::tmdb::{TmdbMovieSearchResult, TmdbPersonSearchResult};

use crate::age::AgeMap;
use crate::filter::{filter_by_genre, restrict_to_actors};

// --- Sort order ---

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortOrder {
    /// Returns the wire name (`asc` / `desc`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Applies the direction to an ascending comparison.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => bail!("invalid sort order: {other} (expected asc or desc)"),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Movie keys ---

/// Sort key for movie results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieSortKey {
    /// Case-insensitive title.
    Title,
    /// Release date, missing dates at the epoch.
    ReleaseDate,
    /// Vote average.
    VoteAverage,
    /// Popularity score.
    Popularity,
}

impl MovieSortKey {
    /// All keys in display order.
    pub const ALL: [Self; 4] = [
        Self::Title,
        Self::ReleaseDate,
        Self::VoteAverage,
        Self::Popularity,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ReleaseDate => "release_date",
            Self::VoteAverage => "vote_average",
            Self::Popularity => "popularity",
        }
    }

    /// Returns the UI label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::ReleaseDate => "Release date",
            Self::VoteAverage => "Rating",
            Self::Popularity => "Popularity",
        }
    }

    fn compare(self, a: &TmdbMovieSearchResult, b: &TmdbMovieSearchResult) -> Ordering {
        match self {
            Self::Title => movie_title_key(a).cmp(&movie_title_key(b)),
            Self::ReleaseDate => release_timestamp(a.release_date.as_deref())
                .cmp(&release_timestamp(b.release_date.as_deref())),
            Self::VoteAverage => a.vote_average.total_cmp(&b.vote_average),
            Self::Popularity => a.popularity.total_cmp(&b.popularity),
        }
    }
}

impl FromStr for MovieSortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "title" | "name" => Ok(Self::Title),
            "release_date" => Ok(Self::ReleaseDate),
            "vote_average" => Ok(Self::VoteAverage),
            "popularity" => Ok(Self::Popularity),
            other => bail!(
                "invalid movie sort key: {other} (expected title, release_date, vote_average or popularity)"
            ),
        }
    }
}

impl fmt::Display for MovieSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Person keys ---

/// Sort key for person results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonSortKey {
    /// Case-insensitive name.
    Name,
    /// Popularity score.
    Popularity,
    /// Number of known-for titles.
    MovieCount,
    /// Age from the age map, unknown last.
    Age,
}

impl PersonSortKey {
    /// All keys in display order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Popularity, Self::MovieCount, Self::Age];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Popularity => "popularity",
            Self::MovieCount => "movie_count",
            Self::Age => "age",
        }
    }

    /// Returns the UI label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Popularity => "Popularity",
            Self::MovieCount => "Movies",
            Self::Age => "Age",
        }
    }
}

impl FromStr for PersonSortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(Self::Name),
            "popularity" => Ok(Self::Popularity),
            "movie_count" => Ok(Self::MovieCount),
            "age" => Ok(Self::Age),
            other => bail!(
                "invalid person sort key: {other} (expected name, popularity, movie_count or age)"
            ),
        }
    }
}

impl fmt::Display for PersonSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Helpers ---

/// Parses a `YYYY-MM-DD` release date into a Unix timestamp.
///
/// Missing or unparseable dates map to 0 (the epoch).
#[must_use]
pub fn release_timestamp(date: Option<&str>) -> i64 {
    date.and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(0, |dt| dt.and_utc().timestamp())
}

fn movie_title_key(movie: &TmdbMovieSearchResult) -> String {
    let title = if movie.title.is_empty() {
        movie.original_title.as_deref().unwrap_or_default()
    } else {
        movie.title.as_str()
    };
    title.to_lowercase()
}

fn compare_people(
    key: PersonSortKey,
    order: SortOrder,
    a: &TmdbPersonSearchResult,
    b: &TmdbPersonSearchResult,
    ages: &AgeMap,
) -> Ordering {
    match key {
        PersonSortKey::Name => order.apply(a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        PersonSortKey::Popularity => order.apply(a.popularity.total_cmp(&b.popularity)),
        PersonSortKey::MovieCount => order.apply(a.known_for.len().cmp(&b.known_for.len())),
        PersonSortKey::Age => {
            let age_a = ages.get(&a.id).copied().flatten();
            let age_b = ages.get(&b.id).copied().flatten();
            match (age_a, age_b) {
                (Some(x), Some(y)) => order.apply(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
    }
}

// --- Pipelines ---

/// Returns a sorted copy of `movies`. Without a key the input order is kept.
#[must_use]
pub fn sort_movies(
    movies: &[TmdbMovieSearchResult],
    key: Option<MovieSortKey>,
    order: SortOrder,
) -> Vec<TmdbMovieSearchResult> {
    let mut sorted = movies.to_vec();
    if let Some(key) = key {
        sorted.sort_by(|a, b| order.apply(key.compare(a, b)));
    }
    sorted
}

/// Restricts `people` to named actors and returns them sorted.
///
/// The restriction applies even without a sort key.
#[must_use]
pub fn sort_people(
    people: &[TmdbPersonSearchResult],
    key: Option<PersonSortKey>,
    order: SortOrder,
    ages: &AgeMap,
) -> Vec<TmdbPersonSearchResult> {
    let mut sorted = restrict_to_actors(people);
    if let Some(key) = key {
        sorted.sort_by(|a, b| compare_people(key, order, a, b, ages));
    }
    sorted
}

/// Genre filter followed by sort.
#[must_use]
pub fn apply_movie_pipeline(
    movies: &[TmdbMovieSearchResult],
    genre_id: Option<i64>,
    key: Option<MovieSortKey>,
    order: SortOrder,
) -> Vec<TmdbMovieSearchResult> {
    sort_movies(&filter_by_genre(movies, genre_id), key, order)
}

/// Actor restriction followed by sort.
#[must_use]
pub fn apply_people_pipeline(
    people: &[TmdbPersonSearchResult],
    key: Option<PersonSortKey>,
    order: SortOrder,
    ages: &AgeMap,
) -> Vec<TmdbPersonSearchResult> {
    sort_people(people, key, order, ages)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use reelscout_api::tmdb::TmdbKnownFor;

    use super::*;

    fn movie(id: u64, title: &str) -> TmdbMovieSearchResult {
        TmdbMovieSearchResult {
            id,
            title: String::from(title),
            ..TmdbMovieSearchResult::default()
        }
    }

    fn actor(id: u64, name: &str, popularity: f64, known_for: usize) -> TmdbPersonSearchResult {
        TmdbPersonSearchResult {
            id,
            name: String::from(name),
            known_for_department: Some(String::from("Acting")),
            popularity,
            known_for: (0..known_for)
                .map(|i| TmdbKnownFor {
                    id: u64::try_from(i).unwrap(),
                    ..TmdbKnownFor::default()
                })
                .collect(),
            ..TmdbPersonSearchResult::default()
        }
    }

    fn movie_ids(movies: &[TmdbMovieSearchResult]) -> Vec<u64> {
        movies.iter().map(|m| m.id).collect()
    }

    fn person_ids(people: &[TmdbPersonSearchResult]) -> Vec<u64> {
        people.iter().map(|p| p.id).collect()
    }

    fn sample_movies() -> Vec<TmdbMovieSearchResult> {
        vec![
            TmdbMovieSearchResult {
                release_date: Some(String::from("1995-12-15")),
                vote_average: 7.9,
                popularity: 40.0,
                genre_ids: vec![80, 18],
                ..movie(1, "Heat")
            },
            TmdbMovieSearchResult {
                release_date: Some(String::new()),
                vote_average: 0.0,
                popularity: 1.5,
                genre_ids: vec![18],
                ..movie(2, "heat wave")
            },
            TmdbMovieSearchResult {
                release_date: Some(String::from("2013-03-28")),
                vote_average: 6.2,
                popularity: 22.0,
                genre_ids: vec![35, 80],
                ..movie(3, "The Heat")
            },
            TmdbMovieSearchResult {
                release_date: None,
                vote_average: 5.0,
                popularity: 3.0,
                ..movie(4, "Anna")
            },
        ]
    }

    #[test]
    fn test_sort_order_parse() {
        // Arrange & Act & Assert
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
    }

    #[test]
    fn test_sort_key_parse() {
        // Arrange & Act & Assert
        assert_eq!(
            "release_date".parse::<MovieSortKey>().unwrap(),
            MovieSortKey::ReleaseDate
        );
        assert_eq!("name".parse::<MovieSortKey>().unwrap(), MovieSortKey::Title);
        assert_eq!(
            "movie_count".parse::<PersonSortKey>().unwrap(),
            PersonSortKey::MovieCount
        );
        assert!("age".parse::<MovieSortKey>().is_err());
        assert!("release_date".parse::<PersonSortKey>().is_err());
    }

    #[test]
    fn test_wire_names_round_trip() {
        // Arrange & Act & Assert
        for key in MovieSortKey::ALL {
            assert_eq!(key.as_str().parse::<MovieSortKey>().unwrap(), key);
        }
        for key in PersonSortKey::ALL {
            assert_eq!(key.as_str().parse::<PersonSortKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_release_timestamp() {
        // Arrange & Act & Assert
        assert_eq!(release_timestamp(Some("1970-01-02")), 86_400);
        assert_eq!(release_timestamp(Some("")), 0);
        assert_eq!(release_timestamp(Some("not a date")), 0);
        assert_eq!(release_timestamp(None), 0);
    }

    #[test]
    fn test_title_sort_ascending() {
        // Arrange
        let movies = vec![movie(1, "B"), movie(2, "A")];

        // Act
        let sorted = sort_movies(&movies, Some(MovieSortKey::Title), SortOrder::Asc);

        // Assert
        assert_eq!(sorted[0].title, "A");
        assert_eq!(sorted[1].title, "B");
        assert_eq!(movies[0].title, "B");
    }

    #[test]
    fn test_title_sort_is_case_insensitive() {
        // Arrange
        let movies = sample_movies();

        // Act
        let sorted = sort_movies(&movies, Some(MovieSortKey::Title), SortOrder::Asc);

        // Assert
        assert_eq!(movie_ids(&sorted), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_title_falls_back_to_original_title() {
        // Arrange
        let untitled = TmdbMovieSearchResult {
            original_title: Some(String::from("Aaa")),
            ..movie(9, "")
        };
        let movies = vec![movie(1, "Bbb"), untitled];

        // Act
        let sorted = sort_movies(&movies, Some(MovieSortKey::Title), SortOrder::Asc);

        // Assert
        assert_eq!(movie_ids(&sorted), vec![9, 1]);
    }

    #[test]
    fn test_release_date_missing_sorts_as_epoch() {
        // Arrange
        let movies = sample_movies();

        // Act
        let sorted = sort_movies(&movies, Some(MovieSortKey::ReleaseDate), SortOrder::Asc);

        // Assert
        assert_eq!(movie_ids(&sorted), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_numeric_keys_descending() {
        // Arrange
        let movies = sample_movies();

        // Act
        let by_vote = sort_movies(&movies, Some(MovieSortKey::VoteAverage), SortOrder::Desc);
        let by_popularity = sort_movies(&movies, Some(MovieSortKey::Popularity), SortOrder::Desc);

        // Assert
        assert_eq!(movie_ids(&by_vote), vec![1, 3, 4, 2]);
        assert_eq!(movie_ids(&by_popularity), vec![1, 3, 4, 2]);
    }

    #[test]
    fn test_no_key_preserves_input_order() {
        // Arrange
        let movies = sample_movies();

        // Act
        let sorted = sort_movies(&movies, None, SortOrder::Asc);

        // Assert
        assert_eq!(sorted, movies);
    }

    #[test]
    fn test_descending_is_reverse_of_ascending_without_ties() {
        // Arrange
        let movies = sample_movies();

        // Act
        let asc = sort_movies(&movies, Some(MovieSortKey::Popularity), SortOrder::Asc);
        let mut desc = sort_movies(&movies, Some(MovieSortKey::Popularity), SortOrder::Desc);
        desc.reverse();

        // Assert
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_ties_keep_input_order_in_both_directions() {
        // Arrange
        let movies = vec![movie(1, "Same"), movie(2, "same"), movie(3, "Other")];

        // Act
        let asc = sort_movies(&movies, Some(MovieSortKey::Title), SortOrder::Asc);
        let desc = sort_movies(&movies, Some(MovieSortKey::Title), SortOrder::Desc);

        // Assert
        assert_eq!(movie_ids(&asc), vec![3, 1, 2]);
        assert_eq!(movie_ids(&desc), vec![1, 2, 3]);
    }

    #[test]
    fn test_sorting_preserves_id_multiset() {
        // Arrange
        let movies = sample_movies();

        // Act & Assert
        for key in MovieSortKey::ALL {
            let mut ids = movie_ids(&sort_movies(&movies, Some(key), SortOrder::Desc));
            ids.sort_unstable();
            assert_eq!(ids, vec![1, 2, 3, 4], "key {key}");
        }
    }

    #[test]
    fn test_movie_pipeline_filters_then_sorts() {
        // Arrange
        let movies = sample_movies();

        // Act
        let result = apply_movie_pipeline(
            &movies,
            Some(80),
            Some(MovieSortKey::ReleaseDate),
            SortOrder::Desc,
        );

        // Assert
        assert_eq!(movie_ids(&result), vec![3, 1]);
    }

    #[test]
    fn test_people_restriction_applies_without_key() {
        // Arrange
        let people = vec![
            actor(1, "Bono", 10.0, 1),
            actor(2, "Tom Hanks", 50.0, 3),
            actor(3, "Meg Ryan", 30.0, 2),
        ];

        // Act
        let sorted = sort_people(&people, None, SortOrder::Asc, &AgeMap::new());

        // Assert
        assert_eq!(person_ids(&sorted), vec![2, 3]);
    }

    #[test]
    fn test_people_sort_by_name_popularity_and_movie_count() {
        // Arrange
        let people = vec![
            actor(1, "tom hanks", 50.0, 3),
            actor(2, "Meg Ryan", 30.0, 4),
            actor(3, "Bill Pullman", 40.0, 1),
        ];
        let ages = AgeMap::new();

        // Act
        let by_name = sort_people(&people, Some(PersonSortKey::Name), SortOrder::Asc, &ages);
        let by_popularity = apply_people_pipeline(
            &people,
            Some(PersonSortKey::Popularity),
            SortOrder::Desc,
            &ages,
        );
        let by_count = sort_people(
            &people,
            Some(PersonSortKey::MovieCount),
            SortOrder::Desc,
            &ages,
        );

        // Assert
        assert_eq!(person_ids(&by_name), vec![3, 2, 1]);
        assert_eq!(person_ids(&by_popularity), vec![1, 3, 2]);
        assert_eq!(person_ids(&by_count), vec![2, 1, 3]);
    }

    #[test]
    fn test_unknown_ages_sort_last_in_both_directions() {
        // Arrange
        let people = vec![
            actor(1, "Unknown Person", 1.0, 0),
            actor(2, "Old Actor", 1.0, 0),
            actor(3, "Missing Entry", 1.0, 0),
            actor(4, "Young Actor", 1.0, 0),
        ];
        let ages = AgeMap::from([(1, None), (2, Some(80)), (4, Some(25))]);

        // Act
        let asc = sort_people(&people, Some(PersonSortKey::Age), SortOrder::Asc, &ages);
        let desc = sort_people(&people, Some(PersonSortKey::Age), SortOrder::Desc, &ages);

        // Assert
        assert_eq!(person_ids(&asc), vec![4, 2, 1, 3]);
        assert_eq!(person_ids(&desc), vec![2, 4, 1, 3]);
    }
}
