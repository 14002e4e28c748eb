//! Interactive search page main loop.

/// Search page state types.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use reelscout_api::tmdb::{
    TmdbClient, TmdbGenreList, TmdbPersonDetails, TmdbPersonMovieCredits,
    TmdbSearchMovieResponse, TmdbSearchPersonResponse,
};
use reelscout_core::{
    AgeLoader, AgeMap, CancellationToken, EntityKind, LocalStorage, MoviesStore, QueryCache,
    QueryKey, SearchSession,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use self::state::{InputMode, ResultRow, SearchPageState};

/// Idle wait between terminal polls.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Person details and credits, or the load error.
type DetailResult = Result<(Arc<TmdbPersonDetails>, Arc<TmdbPersonMovieCredits>), String>;

/// Results delivered by background fetches.
#[derive(Debug)]
enum Message {
    Movies(QueryKey, Result<Arc<TmdbSearchMovieResponse>, String>),
    People(QueryKey, Result<Arc<TmdbSearchPersonResponse>, String>),
    Genres(Result<Arc<TmdbGenreList>, String>),
    Ages(u64, Option<AgeMap>),
    Detail(u64, DetailResult),
}

/// Side effects requested by a key press.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    None,
    Quit,
    OpenUrl(String),
    ToggleFavorite(u64),
    LoadDetail(u64),
}

/// Background work shared by the event loop.
struct Fetcher {
    cache: Arc<QueryCache<TmdbClient>>,
    ages: AgeLoader<TmdbClient>,
    tx: UnboundedSender<Message>,
    today: NaiveDate,
    age_ids: Option<Vec<u64>>,
    age_cancel: CancellationToken,
    age_generation: u64,
}

impl Fetcher {
    fn fetch_genres(&self) {
        let cache = Arc::clone(&self.cache);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = cache.genres().await.map_err(|e| format!("{e:#}"));
            let _ = tx.send(Message::Genres(result));
        });
    }

    fn fetch_page(&self, key: QueryKey) {
        let cache = Arc::clone(&self.cache);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let message = match key.kind {
                EntityKind::Movies => {
                    let result = cache
                        .search_movies(&key.term, key.page)
                        .await
                        .map_err(|e| format!("{e:#}"));
                    Message::Movies(key, result)
                }
                EntityKind::People => {
                    let result = cache
                        .search_people(&key.term, key.page)
                        .await
                        .map_err(|e| format!("{e:#}"));
                    Message::People(key, result)
                }
            };
            let _ = tx.send(message);
        });
    }

    fn fetch_detail(&self, person_id: u64) {
        let cache = Arc::clone(&self.cache);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = futures::future::try_join(
                cache.person(person_id),
                cache.person_credits(person_id),
            )
            .await
            .map_err(|e| format!("{e:#}"));
            let _ = tx.send(Message::Detail(person_id, result));
        });
    }

    /// Starts, restarts or cancels age loading so it matches the shown people.
    fn sync_ages(&mut self, state: &mut SearchPageState) {
        let wanted = if state.session.needs_ages() {
            Some(state.person_ids()).filter(|ids| !ids.is_empty())
        } else {
            None
        };
        if wanted == self.age_ids {
            return;
        }

        self.age_cancel.cancel();
        self.age_generation = self.age_generation.wrapping_add(1);
        self.age_ids.clone_from(&wanted);

        let Some(ids) = wanted else {
            state.ages_loading = false;
            return;
        };
        let cancel = CancellationToken::new();
        self.age_cancel = cancel.clone();
        state.ages_loading = true;

        let handle = self.ages.spawn(ids, self.today, cancel);
        let generation = self.age_generation;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let ages = handle.await.ok().flatten();
            let _ = tx.send(Message::Ages(generation, ages));
        });
    }
}

/// Runs the interactive search page.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub async fn run_search_page(
    cache: Arc<QueryCache<TmdbClient>>,
    ages: AgeLoader<TmdbClient>,
    store: &mut MoviesStore<Box<dyn LocalStorage>>,
    session: SearchSession,
) -> Result<()> {
    let (tx, mut rx) = unbounded_channel();
    let mut fetcher = Fetcher {
        cache,
        ages,
        tx,
        today: chrono::Local::now().date_naive(),
        age_ids: None,
        age_cancel: CancellationToken::new(),
        age_generation: 0,
    };
    let mut state = SearchPageState::new(session, store.favorites().to_vec());

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &mut fetcher, &mut rx, store).await;

    fetcher.age_cancel.cancel();

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut SearchPageState,
    fetcher: &mut Fetcher,
    rx: &mut UnboundedReceiver<Message>,
    store: &mut MoviesStore<Box<dyn LocalStorage>>,
) -> Result<()> {
    let mut main_area_height: u16 = 0;

    loop {
        while let Ok(message) = rx.try_recv() {
            apply_message(state, fetcher.age_generation, message);
        }
        if state.take_genre_request() {
            fetcher.fetch_genres();
        }
        if let Some(key) = state.take_pending_request() {
            fetcher.fetch_page(key);
        }
        fetcher.sync_ages(state);

        let today = fetcher.today;
        terminal
            .draw(|frame| {
                main_area_height = ui::draw(frame, state, today);
            })
            .context("failed to draw TUI")?;

        let page_size = usize::from(main_area_height.saturating_sub(4));

        if !event::poll(Duration::ZERO).context("failed to poll events")? {
            tokio::time::sleep(POLL_INTERVAL).await;
            continue;
        }
        let Event::Key(key) = event::read().context("failed to read event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let action = match state.input_mode {
            InputMode::Search => handle_search_input(state, key.code),
            InputMode::Normal => handle_normal_input(state, key.code, key.modifiers, page_size),
        };
        match action {
            Action::None => {}
            Action::Quit => return Ok(()),
            Action::OpenUrl(url) => {
                let _ = open::that(&url);
            }
            Action::ToggleFavorite(movie_id) => {
                store.toggle_favorite(movie_id);
                state.favorites = store.favorites().to_vec();
            }
            Action::LoadDetail(person_id) => fetcher.fetch_detail(person_id),
        }
    }
}

/// Installs a background result into the state.
///
/// Age results from any run other than `age_generation` are dropped.
fn apply_message(state: &mut SearchPageState, age_generation: u64, message: Message) {
    match message {
        Message::Movies(key, Ok(page)) => state.apply_movies(&key, page),
        Message::People(key, Ok(page)) => state.apply_people(&key, page),
        Message::Movies(key, Err(e)) | Message::People(key, Err(e)) => state.apply_error(&key, e),
        Message::Genres(Ok(list)) => state.set_genres(&list.genres),
        Message::Genres(Err(e)) => {
            tracing::debug!(error = %e, "genre list unavailable");
            state.apply_genre_error(&e);
        }
        Message::Ages(generation, Some(ages)) if generation == age_generation => {
            state.set_ages(ages);
        }
        // The loader task ended without publishing.
        Message::Ages(generation, None) if generation == age_generation => {
            state.ages_loading = false;
        }
        Message::Ages(..) => {}
        Message::Detail(person_id, result) => state.apply_detail(person_id, result),
    }
}

/// Handles key input while editing the search box.
fn handle_search_input(state: &mut SearchPageState, key: KeyCode) -> Action {
    match key {
        KeyCode::Esc => {
            let committed = state.session.query().to_owned();
            state.session.set_draft(committed);
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            state.session.commit();
            state.close_detail();
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => state.session.pop_draft(),
        KeyCode::Char(c) => state.session.push_draft(c),
        _ => {}
    }
    Action::None
}

/// Handles key input in normal mode.
fn handle_normal_input(
    state: &mut SearchPageState,
    key: KeyCode,
    modifiers: KeyModifiers,
    page_size: usize,
) -> Action {
    match key {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
        KeyCode::Esc => state.close_detail(),
        KeyCode::Char('/') => state.input_mode = InputMode::Search,
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::PageUp => state.page_up(page_size),
        KeyCode::PageDown => state.page_down(page_size),
        KeyCode::Right | KeyCode::Char('n') => {
            state.session.next_page();
        }
        KeyCode::Left | KeyCode::Char('p') => {
            state.session.prev_page();
        }
        KeyCode::Char('t') => {
            state.session.toggle_kind();
            state.close_detail();
            state.recompute();
        }
        KeyCode::Char('g') => {
            if state.session.kind() == EntityKind::Movies {
                state.cycle_genre();
            }
        }
        KeyCode::Char('s') => {
            state.session.cycle_sort();
            state.recompute();
        }
        KeyCode::Char('r') => {
            state.session.toggle_order();
            state.recompute();
        }
        KeyCode::Char('R') => state.retry(),
        KeyCode::Char('f') => {
            if let Some(ResultRow::Movie(m)) = state.current_row() {
                return Action::ToggleFavorite(m.id);
            }
        }
        KeyCode::Char('o') => {
            if let Some(row) = state.current_row() {
                return Action::OpenUrl(row.tmdb_url());
            }
        }
        KeyCode::Enter => {
            if let Some(ResultRow::Person(p, _)) = state.current_row() {
                let person_id = p.id;
                state.open_detail(person_id);
                return Action::LoadDetail(person_id);
            }
        }
        _ => {}
    }
    Action::None
}
