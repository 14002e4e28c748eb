//! Search page TUI state management.

use std::sync::Arc;

use ratatui::widgets::TableState;
use reelscout_api::tmdb::{
    TmdbGenre, TmdbMovieSearchResult, TmdbPersonDetails, TmdbPersonMovieCredits,
    TmdbPersonSearchResult, TmdbSearchMovieResponse, TmdbSearchPersonResponse,
};
use reelscout_core::{
    AgeMap, EntityKind, QueryKey, SearchSession, apply_movie_pipeline, apply_people_pipeline,
    genre_choices, restrict_to_actors,
};

/// Input mode for the search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search box editing mode.
    Search,
}

/// A displayed result row.
#[derive(Debug, Clone)]
pub enum ResultRow {
    /// Movie result.
    Movie(TmdbMovieSearchResult),
    /// Person result with the resolved age, if any.
    Person(TmdbPersonSearchResult, Option<i32>),
}

impl ResultRow {
    /// TMDB id of the row.
    #[must_use]
    pub const fn id(&self) -> u64 {
        match self {
            Self::Movie(m) => m.id,
            Self::Person(p, _) => p.id,
        }
    }

    /// Public TMDB page of the row.
    #[must_use]
    pub fn tmdb_url(&self) -> String {
        match self {
            Self::Movie(m) => format!("{TMDB_WEB_URL}/movie/{}", m.id),
            Self::Person(p, _) => format!("{TMDB_WEB_URL}/person/{}", p.id),
        }
    }
}

/// TMDB website root.
pub const TMDB_WEB_URL: &str = "https://www.themoviedb.org";

/// Person detail pane contents.
#[derive(Debug, Clone)]
pub struct PersonDetail {
    /// Person being shown.
    pub person_id: u64,
    /// Details, once loaded.
    pub details: Option<Arc<TmdbPersonDetails>>,
    /// Movie credits, once loaded.
    pub credits: Option<Arc<TmdbPersonMovieCredits>>,
    /// Load error.
    pub error: Option<String>,
}

/// Loaded page of either entity type.
#[derive(Debug, Clone)]
enum LoadedPage {
    Movies(Arc<TmdbSearchMovieResponse>),
    People(Arc<TmdbSearchPersonResponse>),
}

/// State for the search page TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchPageState {
    /// Query, paging and filter controls.
    pub session: SearchSession,
    /// Genre filter choices, `All` first.
    pub genres: Vec<TmdbGenre>,
    /// Table state for the result list.
    pub table_state: TableState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// A page request is in flight.
    pub loading: bool,
    /// An age batch load is in flight.
    pub ages_loading: bool,
    /// Last request error.
    pub error: Option<String>,
    /// Favorite movie ids.
    pub favorites: Vec<u64>,
    /// Open person detail pane.
    pub detail: Option<PersonDetail>,
    /// The genre list should be fetched.
    genres_wanted: bool,
    /// Key of the page shown (or being loaded).
    requested: Option<QueryKey>,
    page: Option<LoadedPage>,
    ages: AgeMap,
    rows: Vec<ResultRow>,
}

impl SearchPageState {
    /// Creates a state with an empty result list.
    #[must_use]
    pub fn new(session: SearchSession, favorites: Vec<u64>) -> Self {
        Self {
            session,
            genres: genre_choices(&[]),
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            loading: false,
            ages_loading: false,
            error: None,
            favorites,
            detail: None,
            genres_wanted: true,
            requested: None,
            page: None,
            ages: AgeMap::new(),
            rows: Vec::new(),
        }
    }

    // --- Rows ---

    /// Rows after filtering and sorting.
    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Row under the cursor.
    #[must_use]
    pub fn current_row(&self) -> Option<&ResultRow> {
        self.rows.get(self.cursor())
    }

    /// Cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Whether a movie is a favorite.
    #[must_use]
    pub fn is_favorite(&self, movie_id: u64) -> bool {
        self.favorites.contains(&movie_id)
    }

    /// Number of results on the page before client-side filtering.
    #[must_use]
    pub fn page_result_count(&self) -> usize {
        match &self.page {
            Some(LoadedPage::Movies(p)) => p.results.len(),
            Some(LoadedPage::People(p)) => p.results.len(),
            None => 0,
        }
    }

    /// Total results reported by the API for the query.
    #[must_use]
    pub fn total_results(&self) -> u32 {
        match &self.page {
            Some(LoadedPage::Movies(p)) => p.total_results,
            Some(LoadedPage::People(p)) => p.total_results,
            None => 0,
        }
    }

    // --- Requests ---

    /// Key the session currently asks for.
    #[must_use]
    pub fn wanted_key(&self) -> QueryKey {
        QueryKey::new(self.session.kind(), self.session.query(), self.session.page())
    }

    /// Returns the key to fetch when the session asks for a page that was
    /// not requested yet, and marks it requested.
    pub fn take_pending_request(&mut self) -> Option<QueryKey> {
        let wanted = self.wanted_key();
        if self.requested.as_ref() == Some(&wanted) {
            return None;
        }
        self.requested = Some(wanted.clone());
        self.loading = !wanted.term.is_empty();
        self.error = None;
        Some(wanted)
    }

    /// Whether `key` is the page currently wanted.
    #[must_use]
    pub fn is_current(&self, key: &QueryKey) -> bool {
        self.requested.as_ref() == Some(key)
    }

    /// Installs a movie page. Ignored when the page is stale.
    pub fn apply_movies(&mut self, key: &QueryKey, page: Arc<TmdbSearchMovieResponse>) {
        if !self.is_current(key) {
            return;
        }
        self.loading = false;
        self.session.set_total_pages(page.total_pages);
        self.page = Some(LoadedPage::Movies(page));
        self.recompute();
    }

    /// Installs a people page. Ignored when the page is stale.
    pub fn apply_people(&mut self, key: &QueryKey, page: Arc<TmdbSearchPersonResponse>) {
        if !self.is_current(key) {
            return;
        }
        self.loading = false;
        self.session.set_total_pages(page.total_pages);
        self.page = Some(LoadedPage::People(page));
        self.recompute();
    }

    /// Records a failed page request. Ignored when stale.
    pub fn apply_error(&mut self, key: &QueryKey, error: String) {
        if !self.is_current(key) {
            return;
        }
        self.loading = false;
        self.error = Some(error);
        self.page = None;
        self.recompute();
    }

    /// Forgets the last request so the current page is fetched again.
    /// Also asks for the genre list again while only `All` is known.
    pub fn retry(&mut self) {
        self.requested = None;
        if self.genres.len() <= 1 {
            self.genres_wanted = true;
        }
    }

    /// Returns whether the genre list should be fetched, and marks it requested.
    pub fn take_genre_request(&mut self) -> bool {
        std::mem::take(&mut self.genres_wanted)
    }

    /// Installs genre choices.
    pub fn set_genres(&mut self, genres: &[TmdbGenre]) {
        self.genres = genre_choices(genres);
    }

    /// Records a failed genre list request.
    pub fn apply_genre_error(&mut self, error: &str) {
        self.error = Some(format!("genres: {error}"));
    }

    /// Selects the next genre filter, wrapping to `All`.
    pub fn cycle_genre(&mut self) {
        let current = self.session.genre().unwrap_or(0);
        let position = self
            .genres
            .iter()
            .position(|g| i64::from(g.id) == current)
            .unwrap_or(0);
        let next = self
            .genres
            .get(position.saturating_add(1))
            .or_else(|| self.genres.first())
            .map_or(0, |g| i64::from(g.id));
        self.session.set_genre(Some(next));
        self.recompute();
    }

    /// Name of the active genre filter.
    #[must_use]
    pub fn genre_label(&self) -> &str {
        let current = self.session.genre().unwrap_or(0);
        self.genres
            .iter()
            .find(|g| i64::from(g.id) == current)
            .map_or("All", |g| g.name.as_str())
    }

    // --- Ages ---

    /// Ids of the actors on the loaded page, the only people shown.
    #[must_use]
    pub fn person_ids(&self) -> Vec<u64> {
        match &self.page {
            Some(LoadedPage::People(p)) => restrict_to_actors(&p.results)
                .iter()
                .map(|p| p.id)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Publishes resolved ages.
    pub fn set_ages(&mut self, ages: AgeMap) {
        self.ages.extend(ages);
        self.ages_loading = false;
        self.recompute();
    }

    // --- Detail ---

    /// Opens the detail pane for a person.
    pub fn open_detail(&mut self, person_id: u64) {
        self.detail = Some(PersonDetail {
            person_id,
            details: None,
            credits: None,
            error: None,
        });
    }

    /// Closes the detail pane.
    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Installs loaded person data. Ignored when another person is shown.
    pub fn apply_detail(
        &mut self,
        person_id: u64,
        result: Result<(Arc<TmdbPersonDetails>, Arc<TmdbPersonMovieCredits>), String>,
    ) {
        let Some(detail) = self.detail.as_mut().filter(|d| d.person_id == person_id) else {
            return;
        };
        match result {
            Ok((details, credits)) => {
                detail.details = Some(details);
                detail.credits = Some(credits);
            }
            Err(e) => detail.error = Some(e),
        }
    }

    // --- Recompute ---

    /// Rebuilds rows through the filter/sort pipeline.
    pub fn recompute(&mut self) {
        let selected_id = self.current_row().map(ResultRow::id);
        self.rows = match &self.page {
            Some(LoadedPage::Movies(p)) if self.session.kind() == EntityKind::Movies => {
                apply_movie_pipeline(
                    &p.results,
                    self.session.genre(),
                    self.session.movie_sort_key(),
                    self.session.order(),
                )
                .into_iter()
                .map(ResultRow::Movie)
                .collect()
            }
            Some(LoadedPage::People(p)) if self.session.kind() == EntityKind::People => {
                apply_people_pipeline(
                    &p.results,
                    self.session.person_sort_key(),
                    self.session.order(),
                    &self.ages,
                )
                .into_iter()
                .map(|person| {
                    let age = self.ages.get(&person.id).copied().flatten();
                    ResultRow::Person(person, age)
                })
                .collect()
            }
            _ => Vec::new(),
        };
        let cursor = selected_id
            .and_then(|id| self.rows.iter().position(|r| r.id() == id))
            .unwrap_or(0);
        self.table_state
            .select(if self.rows.is_empty() { None } else { Some(cursor) });
    }

    // --- Navigation ---

    /// Moves cursor up.
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if current > 0 {
            self.table_state.select(Some(current.saturating_sub(1)));
        }
    }

    /// Moves cursor down.
    pub fn move_down(&mut self) {
        let next = self.cursor().saturating_add(1);
        if next < self.rows.len() {
            self.table_state.select(Some(next));
        }
    }

    /// Scrolls up by a page.
    pub fn page_up(&mut self, page_size: usize) {
        if !self.rows.is_empty() {
            self.table_state
                .select(Some(self.cursor().saturating_sub(page_size)));
        }
    }

    /// Scrolls down by a page.
    pub fn page_down(&mut self, page_size: usize) {
        if !self.rows.is_empty() {
            let max = self.rows.len().saturating_sub(1);
            self.table_state
                .select(Some(self.cursor().saturating_add(page_size).min(max)));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use reelscout_api::tmdb::TmdbPaginated;
    use reelscout_core::SortOrder;

    use super::*;

    fn movie(id: u64, title: &str, genre_ids: &[u32], popularity: f64) -> TmdbMovieSearchResult {
        TmdbMovieSearchResult {
            id,
            title: String::from(title),
            genre_ids: genre_ids.to_vec(),
            popularity,
            ..TmdbMovieSearchResult::default()
        }
    }

    fn actor(id: u64, name: &str) -> TmdbPersonSearchResult {
        TmdbPersonSearchResult {
            id,
            name: String::from(name),
            known_for_department: Some(String::from("Acting")),
            ..TmdbPersonSearchResult::default()
        }
    }

    fn page<T>(results: Vec<T>, total_pages: u32) -> Arc<TmdbPaginated<T>> {
        Arc::new(TmdbPaginated {
            page: 1,
            total_results: 0,
            results,
            total_pages,
        })
    }

    fn searching(kind: EntityKind, term: &str) -> (SearchPageState, QueryKey) {
        let mut state = SearchPageState::new(SearchSession::new(kind, SortOrder::Asc), Vec::new());
        state.session.set_draft(term);
        state.session.commit();
        let key = state.take_pending_request().unwrap();
        (state, key)
    }

    fn ids(state: &SearchPageState) -> Vec<u64> {
        state.rows().iter().map(ResultRow::id).collect()
    }

    #[test]
    fn test_pending_request_issued_once() {
        // Arrange
        let (mut state, key) = searching(EntityKind::Movies, "heat");

        // Act
        let again = state.take_pending_request();

        // Assert
        assert_eq!(key, QueryKey::new(EntityKind::Movies, "heat", 1));
        assert!(again.is_none());
        assert!(state.loading);
    }

    #[test]
    fn test_empty_query_does_not_show_loading() {
        // Arrange
        let mut state = SearchPageState::new(
            SearchSession::new(EntityKind::Movies, SortOrder::Asc),
            Vec::new(),
        );

        // Act
        let key = state.take_pending_request().unwrap();

        // Assert
        assert!(key.term.is_empty());
        assert!(!state.loading);
    }

    #[test]
    fn test_movies_filtered_and_sorted() {
        // Arrange
        let (mut state, key) = searching(EntityKind::Movies, "heat");
        state.session.set_sort_by(Some("popularity")).unwrap();
        state.take_pending_request();

        // Act
        state.apply_movies(
            &state.wanted_key(),
            page(
                vec![
                    movie(1, "Heat", &[80], 10.0),
                    movie(2, "Heat Wave", &[18], 30.0),
                    movie(3, "The Heat", &[80], 20.0),
                ],
                3,
            ),
        );

        // Assert
        assert_eq!(ids(&state), vec![1, 3, 2]);
        assert_eq!(state.session.total_pages(), Some(3));
        assert!(!state.loading);
        assert_eq!(key.page, 1);
    }

    #[test]
    fn test_stale_page_ignored() {
        // Arrange
        let (mut state, old_key) = searching(EntityKind::Movies, "heat");
        state.session.set_draft("alien");
        state.session.commit();
        state.take_pending_request();

        // Act
        state.apply_movies(&old_key, page(vec![movie(1, "Heat", &[], 1.0)], 1));

        // Assert
        assert!(state.rows().is_empty());
        assert!(state.loading);
    }

    #[test]
    fn test_genre_cycle_filters_rows() {
        // Arrange
        let (mut state, key) = searching(EntityKind::Movies, "heat");
        state.set_genres(&[
            TmdbGenre {
                id: 18,
                name: String::from("Drama"),
            },
            TmdbGenre {
                id: 80,
                name: String::from("Crime"),
            },
        ]);
        state.apply_movies(
            &key,
            page(
                vec![movie(1, "Heat", &[80], 1.0), movie(2, "Heat Wave", &[18], 1.0)],
                1,
            ),
        );

        // Act & Assert
        state.cycle_genre();
        assert_eq!(state.genre_label(), "Drama");
        assert_eq!(ids(&state), vec![2]);

        state.cycle_genre();
        assert_eq!(state.genre_label(), "Crime");
        assert_eq!(ids(&state), vec![1]);

        state.cycle_genre();
        assert_eq!(state.genre_label(), "All");
        assert_eq!(ids(&state), vec![1, 2]);
    }

    #[test]
    fn test_people_restricted_and_aged() {
        // Arrange
        let (mut state, key) = searching(EntityKind::People, "tom");
        state.apply_people(
            &key,
            page(
                vec![actor(1, "Tom Hanks"), actor(2, "Tom"), actor(3, "Tom Cruise")],
                1,
            ),
        );
        state.session.set_sort_by(Some("age")).unwrap();

        // Act
        state.set_ages(AgeMap::from([(1, Some(68)), (3, Some(62)), (2, None)]));

        // Assert
        assert_eq!(ids(&state), vec![3, 1]);
        assert_eq!(state.person_ids(), vec![1, 3]);
        assert!(matches!(state.rows()[0], ResultRow::Person(_, Some(62))));
    }

    #[test]
    fn test_error_allows_retry() {
        // Arrange
        let (mut state, key) = searching(EntityKind::Movies, "heat");

        // Act
        state.apply_error(&key, String::from("TMDB API error (401): Invalid API key"));
        let automatic = state.take_pending_request();
        state.retry();
        let manual = state.take_pending_request();

        // Assert
        assert!(automatic.is_none());
        assert_eq!(manual, Some(key));
        assert!(state.error.is_none());
    }

    #[test]
    fn test_genre_failure_shown_and_retried() {
        // Arrange
        let mut state =
            SearchPageState::new(SearchSession::new(EntityKind::Movies, SortOrder::Asc), Vec::new());
        assert!(state.take_genre_request());
        assert!(!state.take_genre_request());

        // Act
        state.apply_genre_error("TMDB API error (HTTP 401)");
        state.retry();

        // Assert
        assert_eq!(
            state.error.as_deref(),
            Some("genres: TMDB API error (HTTP 401)")
        );
        assert!(state.take_genre_request());
    }

    #[test]
    fn test_retry_skips_genres_once_loaded() {
        // Arrange
        let mut state =
            SearchPageState::new(SearchSession::new(EntityKind::Movies, SortOrder::Asc), Vec::new());
        state.take_genre_request();
        state.set_genres(&[TmdbGenre {
            id: 80,
            name: String::from("Crime"),
        }]);

        // Act
        state.retry();

        // Assert
        assert!(!state.take_genre_request());
    }

    #[test]
    fn test_cursor_follows_selected_row_after_resort() {
        // Arrange
        let (mut state, key) = searching(EntityKind::Movies, "heat");
        state.apply_movies(
            &key,
            page(
                vec![movie(1, "A", &[], 3.0), movie(2, "B", &[], 1.0), movie(3, "C", &[], 2.0)],
                1,
            ),
        );
        state.move_down();

        // Act
        state.session.set_sort_by(Some("popularity")).unwrap();
        state.recompute();

        // Assert
        assert_eq!(state.current_row().unwrap().id(), 2);
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_navigation_bounds() {
        // Arrange
        let (mut state, key) = searching(EntityKind::Movies, "heat");
        state.apply_movies(
            &key,
            page(vec![movie(1, "A", &[], 1.0), movie(2, "B", &[], 1.0)], 1),
        );

        // Act & Assert
        state.move_up();
        assert_eq!(state.cursor(), 0);
        state.page_down(10);
        assert_eq!(state.cursor(), 1);
        state.move_down();
        assert_eq!(state.cursor(), 1);
        state.page_up(10);
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_detail_for_other_person_ignored() {
        // Arrange
        let (mut state, _) = searching(EntityKind::People, "tom");
        state.open_detail(31);

        // Act
        state.apply_detail(500, Err(String::from("boom")));

        // Assert
        assert!(state.detail.as_ref().unwrap().error.is_none());
    }

    #[test]
    fn test_tmdb_urls() {
        // Arrange
        let movie_row = ResultRow::Movie(movie(949, "Heat", &[], 1.0));
        let person_row = ResultRow::Person(actor(31, "Tom Hanks"), None);

        // Act & Assert
        assert_eq!(movie_row.tmdb_url(), "https://www.themoviedb.org/movie/949");
        assert_eq!(person_row.tmdb_url(), "https://www.themoviedb.org/person/31");
    }
}
