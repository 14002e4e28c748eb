//! reelscout - TMDB movie and people discovery CLI.

/// Application configuration (TOML).
mod config;
/// `SQLite`-backed local storage.
mod storage;
/// Terminal UI components.
mod tui;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail, ensure};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, SearchConfig, TmdbConfig, resolve_config_path};
use crate::storage::{DbStorage, open_store};
use reelscout_api::tmdb::TmdbClient;
use reelscout_core::{
    AgeLoader, AgeMap, CancellationToken, EntityKind, QueryCache, SearchSession,
    age_from_birthday, apply_movie_pipeline, apply_people_pipeline, restrict_to_actors,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "reelscout", about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List TMDB movie genres.
    Genres,
    /// Search movies or people.
    Search(SearchCommand),
    /// Show a person's details and movie credits.
    Person(PersonArgs),
    /// Manage favorite movies.
    Favorites(FavoritesCommand),
    /// Write or replace the review of a movie.
    Review(ReviewArgs),
    /// List every review.
    Reviews,
    /// Manage playlists.
    Playlist(PlaylistCommand),
    /// Inspect the local storage database.
    Storage(StorageCommand),
    /// Show or create the config file.
    Config(ConfigCommand),
    /// Browse search results interactively.
    Browse(BrowseArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchCommand {
    /// Search subcommand to run.
    #[command(subcommand)]
    command: SearchSubcommands,
}

/// Available search subcommands.
#[derive(Subcommand)]
enum SearchSubcommands {
    /// Search movies by title.
    Movies(SearchMoviesArgs),
    /// Search people by name.
    People(SearchPeopleArgs),
}

/// Arguments for the `search movies` subcommand.
#[derive(clap::Args)]
struct SearchMoviesArgs {
    /// Search term (e.g. "heat").
    #[arg(long, required = true)]
    query: String,
    /// Result page (starting at 1).
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Keep only movies with this genre id (0 or less: all genres).
    #[arg(long, allow_negative_numbers = true)]
    genre: Option<i64>,
    /// Sort key: title, release_date, vote_average or popularity.
    #[arg(long)]
    sort_by: Option<String>,
    /// Sort direction: asc or desc (default from config).
    #[arg(long)]
    order: Option<String>,
}

/// Arguments for the `search people` subcommand.
#[derive(clap::Args)]
struct SearchPeopleArgs {
    /// Search term (e.g. "tom").
    #[arg(long, required = true)]
    query: String,
    /// Result page (starting at 1).
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Sort key: name, popularity, movie_count or age.
    #[arg(long)]
    sort_by: Option<String>,
    /// Sort direction: asc or desc (default from config).
    #[arg(long)]
    order: Option<String>,
}

/// Arguments for the `person` subcommand.
#[derive(clap::Args)]
struct PersonArgs {
    /// TMDB person ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesCommand {
    /// Favorites subcommand to run.
    #[command(subcommand)]
    command: FavoritesSubcommands,
}

/// Available favorites subcommands.
#[derive(Subcommand)]
enum FavoritesSubcommands {
    /// Mark a movie as favorite.
    Add(MovieIdArgs),
    /// Unmark a favorite movie.
    Remove(MovieIdArgs),
    /// List favorite movie ids.
    List,
}

/// A single movie id.
#[derive(clap::Args)]
struct MovieIdArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    movie: u64,
}

/// Arguments for the `review` subcommand.
#[derive(clap::Args)]
struct ReviewArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    movie: u64,
    /// Review text.
    #[arg(long, required = true)]
    text: String,
}

/// Arguments for the `playlist` subcommand.
#[derive(clap::Args)]
struct PlaylistCommand {
    /// Playlist subcommand to run.
    #[command(subcommand)]
    command: PlaylistSubcommands,
}

/// Available playlist subcommands.
#[derive(Subcommand)]
enum PlaylistSubcommands {
    /// Create an empty playlist.
    Create(PlaylistCreateArgs),
    /// Delete a playlist.
    Delete(PlaylistIdArgs),
    /// Rename a playlist.
    Rename(PlaylistRenameArgs),
    /// Add a movie to a playlist.
    Add(PlaylistMovieArgs),
    /// Remove a movie from a playlist.
    Remove(PlaylistMovieArgs),
    /// Remove every movie from a playlist.
    Clear(PlaylistIdArgs),
    /// List playlists.
    List,
}

/// Arguments for the `playlist create` subcommand.
#[derive(clap::Args)]
struct PlaylistCreateArgs {
    /// Playlist name (default: "New Playlist").
    #[arg(long, default_value = "")]
    name: String,
}

/// A single playlist id.
#[derive(clap::Args)]
struct PlaylistIdArgs {
    /// Playlist ID.
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `playlist rename` subcommand.
#[derive(clap::Args)]
struct PlaylistRenameArgs {
    /// Playlist ID.
    #[arg(long, required = true)]
    id: String,
    /// New name.
    #[arg(long, required = true)]
    name: String,
}

/// A playlist id and a movie id.
#[derive(clap::Args)]
struct PlaylistMovieArgs {
    /// Playlist ID.
    #[arg(long, required = true)]
    id: String,
    /// TMDB movie ID.
    #[arg(long, required = true)]
    movie: u64,
}

/// Arguments for the `storage` subcommand.
#[derive(clap::Args)]
struct StorageCommand {
    /// Storage subcommand to run.
    #[command(subcommand)]
    command: StorageSubcommands,
}

/// Available storage subcommands.
#[derive(Subcommand)]
enum StorageSubcommands {
    /// List stored keys.
    List,
    /// Remove a stored key.
    Clear(StorageClearArgs),
}

/// Arguments for the `storage clear` subcommand.
#[derive(clap::Args)]
struct StorageClearArgs {
    /// Key to remove (e.g. "rmdb_playlists_v1").
    #[arg(long, required = true)]
    key: String,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration.
    Show,
    /// Write a config file with default values.
    Init(ConfigInitArgs),
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Initial search term.
    #[arg(long)]
    query: Option<String>,
    /// Start on people instead of movies.
    #[arg(long)]
    people: bool,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: Shell,
}

/// Placeholder for missing values.
const DASH: &str = "-";

/// Builds a TMDB client from `TMDB_API_TOKEN` and the config.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set, the base URL is invalid
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &TmdbConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    let mut builder = TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .min_interval(config.min_interval());
    if let Some(base_url) = &config.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid tmdb.base_url in config: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Loads the config file under `dir` (or the default location).
///
/// # Errors
///
/// Returns an error if the config exists but cannot be read or parsed.
fn load_config(dir: Option<&Path>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds the shared query cache.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build.
fn build_query_cache(config: &TmdbConfig) -> Result<Arc<QueryCache<TmdbClient>>> {
    let client = build_tmdb_client(config)?;
    Ok(Arc::new(QueryCache::new(
        Arc::new(client),
        config.query_options(),
    )))
}

/// Creates a session for `kind` with the given sort options.
///
/// # Errors
///
/// Returns an error if the sort key or direction is invalid.
fn build_session(
    kind: EntityKind,
    sort_by: Option<&str>,
    order: Option<&str>,
    search: &SearchConfig,
) -> Result<SearchSession> {
    let order = match order {
        Some(order) => order.parse().context("invalid --order")?,
        None => search.sort_order()?,
    };
    let mut session = SearchSession::new(kind, order);
    session.set_sort_by(sort_by).context("invalid --sort-by")?;
    Ok(session)
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_genres(config: &AppConfig) -> Result<()> {
    let cache = build_query_cache(&config.tmdb)?;
    let list = cache.genres().await.context("failed to fetch genres")?;

    tracing::info!("ID\tName");
    for genre in &list.genres {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }
    tracing::info!("Total: {} genres", list.genres.len());

    Ok(())
}

/// Runs the `search movies` subcommand.
///
/// # Errors
///
/// Returns an error if the options are invalid or the API request fails.
#[instrument(skip_all)]
async fn run_search_movies(args: &SearchMoviesArgs, config: &AppConfig) -> Result<()> {
    let mut session = build_session(
        EntityKind::Movies,
        args.sort_by.as_deref(),
        args.order.as_deref(),
        &config.search,
    )?;
    session.set_genre(args.genre);
    session.set_draft(args.query.as_str());
    session.commit();
    session.set_page(args.page);

    let cache = build_query_cache(&config.tmdb)?;
    let page = cache
        .search_movies(session.query(), session.page())
        .await
        .context("failed to search movies")?;
    session.set_total_pages(page.total_pages);

    let movies = apply_movie_pipeline(
        &page.results,
        session.genre(),
        session.movie_sort_key(),
        session.order(),
    );

    tracing::info!(
        "Page {}/{} ({} results)",
        page.page,
        page.total_pages,
        page.total_results
    );
    if movies.is_empty() {
        tracing::info!("No results");
        return Ok(());
    }
    tracing::info!("ID\tTitle\t\t\tReleased\tRating\tPopularity");
    for movie in &movies {
        tracing::info!(
            "{}\t{}\t{}\t{:.1}\t{:.1}",
            movie.id,
            movie.title,
            movie
                .release_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(DASH),
            movie.vote_average,
            movie.popularity,
        );
    }
    tracing::info!("Shown: {} of {} on this page", movies.len(), page.results.len());

    Ok(())
}

/// Runs the `search people` subcommand.
///
/// Resolves ages first when sorting by age.
///
/// # Errors
///
/// Returns an error if the options are invalid or the API request fails.
#[instrument(skip_all)]
async fn run_search_people(args: &SearchPeopleArgs, config: &AppConfig) -> Result<()> {
    let mut session = build_session(
        EntityKind::People,
        args.sort_by.as_deref(),
        args.order.as_deref(),
        &config.search,
    )?;
    session.set_draft(args.query.as_str());
    session.commit();
    session.set_page(args.page);

    let cache = build_query_cache(&config.tmdb)?;
    let page = cache
        .search_people(session.query(), session.page())
        .await
        .context("failed to search people")?;
    session.set_total_pages(page.total_pages);

    let ages = if session.needs_ages() {
        let ids: Vec<u64> = restrict_to_actors(&page.results)
            .iter()
            .map(|p| p.id)
            .collect();
        let loader = AgeLoader::new(cache.api(), config.tmdb.language.clone())
            .with_batch_size(config.search.age_batch_size);
        let today = chrono::Local::now().date_naive();
        loader
            .load(&ids, today, &CancellationToken::new())
            .await
            .unwrap_or_default()
    } else {
        AgeMap::new()
    };

    let people = apply_people_pipeline(
        &page.results,
        session.person_sort_key(),
        session.order(),
        &ages,
    );

    tracing::info!(
        "Page {}/{} ({} results)",
        page.page,
        page.total_pages,
        page.total_results
    );
    if people.is_empty() {
        tracing::info!("No results");
        return Ok(());
    }
    tracing::info!("ID\tName\t\t\tPopularity\tMovies\tAge\tKnown for");
    for person in &people {
        let age = ages
            .get(&person.id)
            .copied()
            .flatten()
            .map_or_else(|| String::from(DASH), |a| a.to_string());
        let known_for: Vec<&str> = person
            .known_for
            .iter()
            .filter_map(|k| k.display_title())
            .collect();
        tracing::info!(
            "{}\t{}\t{:.1}\t{}\t{}\t{}",
            person.id,
            person.name,
            person.popularity,
            person.known_for.len(),
            age,
            known_for.join(", "),
        );
    }
    tracing::info!("Shown: {} of {} on this page", people.len(), page.results.len());

    Ok(())
}

/// Runs the `person` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or an API request fails.
#[instrument(skip_all)]
async fn run_person(args: &PersonArgs, config: &AppConfig) -> Result<()> {
    let cache = build_query_cache(&config.tmdb)?;
    let (details, credits) =
        futures::future::try_join(cache.person(args.id), cache.person_credits(args.id))
            .await
            .with_context(|| format!("failed to fetch person {}", args.id))?;

    let today = chrono::Local::now().date_naive();
    let age = age_from_birthday(details.birthday.as_deref(), today)
        .map_or_else(|| String::from(DASH), |a| a.to_string());

    tracing::info!("ID: {}", details.id);
    tracing::info!("Name: {}", details.name);
    tracing::info!(
        "Birthday: {} (age {age})",
        details.birthday.as_deref().unwrap_or(DASH)
    );
    tracing::info!("Deathday: {}", details.deathday.as_deref().unwrap_or(DASH));
    tracing::info!(
        "Place of birth: {}",
        details.place_of_birth.as_deref().unwrap_or(DASH)
    );
    tracing::info!(
        "Known for: {}",
        details.known_for_department.as_deref().unwrap_or(DASH)
    );
    if let Some(bio) = details.biography.as_deref().filter(|b| !b.is_empty()) {
        tracing::info!("Biography: {bio}");
    }
    tracing::info!("---");
    tracing::info!("Movies ({}):", credits.cast.len());
    for credit in &credits.cast {
        tracing::info!(
            "  {}\t{}\t{}\t{}",
            credit.movie.id,
            credit
                .movie
                .release_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(DASH),
            credit.movie.title,
            credit.character.as_deref().unwrap_or(DASH),
        );
    }

    Ok(())
}

/// Runs the `favorites` subcommands.
fn run_favorites(command: &FavoritesSubcommands, dir: Option<&Path>) {
    let mut store = open_store(dir);
    match command {
        FavoritesSubcommands::Add(args) => {
            if store.add_favorite(args.movie) {
                tracing::info!("Added {} to favorites", args.movie);
            } else {
                tracing::info!("{} is already a favorite", args.movie);
            }
        }
        FavoritesSubcommands::Remove(args) => {
            if store.remove_favorite(args.movie) {
                tracing::info!("Removed {} from favorites", args.movie);
            } else {
                tracing::info!("{} is not a favorite", args.movie);
            }
        }
        FavoritesSubcommands::List => {
            if store.favorites().is_empty() {
                tracing::info!("No favorites");
                return;
            }
            tracing::info!("Favorites ({}):", store.favorites().len());
            for movie_id in store.favorites() {
                tracing::info!("  {movie_id}");
            }
        }
    }
}

/// Runs the `review` subcommand.
fn run_review(args: &ReviewArgs, dir: Option<&Path>) {
    let mut store = open_store(dir);
    store.add_review(args.movie, &args.text);
    tracing::info!("Saved review for {}", args.movie);
}

/// Runs the `reviews` subcommand.
fn run_reviews(dir: Option<&Path>) {
    let store = open_store(dir);
    if store.reviews().is_empty() {
        tracing::info!("No reviews");
        return;
    }
    tracing::info!("Movie\tReview");
    for (movie_id, text) in store.reviews() {
        tracing::info!("{movie_id}\t{text}");
    }
}

/// Runs the `playlist` subcommands.
///
/// # Errors
///
/// Returns an error if the playlist id is unknown.
fn run_playlist(command: &PlaylistSubcommands, dir: Option<&Path>) -> Result<()> {
    let mut store = open_store(dir);
    match command {
        PlaylistSubcommands::Create(args) => {
            let id = store.create_playlist(&args.name);
            let name = store.playlist(&id).map_or("", |p| p.name.as_str());
            tracing::info!("Created playlist {id} ({name})");
        }
        PlaylistSubcommands::Delete(args) => {
            ensure!(store.delete_playlist(&args.id), "playlist not found: {}", args.id);
            tracing::info!("Deleted playlist {}", args.id);
        }
        PlaylistSubcommands::Rename(args) => {
            ensure!(
                store.rename_playlist(&args.id, &args.name),
                "playlist not found: {}",
                args.id
            );
            tracing::info!("Renamed playlist {} to {}", args.id, args.name);
        }
        PlaylistSubcommands::Add(args) => {
            ensure!(
                store.add_to_playlist(&args.id, args.movie),
                "playlist not found: {}",
                args.id
            );
            tracing::info!("Added {} to playlist {}", args.movie, args.id);
        }
        PlaylistSubcommands::Remove(args) => {
            ensure!(
                store.remove_from_playlist(&args.id, args.movie),
                "playlist not found: {}",
                args.id
            );
            tracing::info!("Removed {} from playlist {}", args.movie, args.id);
        }
        PlaylistSubcommands::Clear(args) => {
            ensure!(store.clear_playlist(&args.id), "playlist not found: {}", args.id);
            tracing::info!("Cleared playlist {}", args.id);
        }
        PlaylistSubcommands::List => {
            if store.playlists().is_empty() {
                tracing::info!("No playlists");
            }
            for playlist in store.playlists() {
                let movies: Vec<String> =
                    playlist.movie_ids.iter().map(ToString::to_string).collect();
                tracing::info!(
                    "{}\t{}\t{} movies\t[{}]",
                    playlist.id,
                    playlist.name,
                    playlist.movie_ids.len(),
                    movies.join(", ")
                );
            }
        }
    }
    Ok(())
}

/// Runs the `storage` subcommands.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried.
fn run_storage(command: &StorageSubcommands, dir: Option<&Path>) -> Result<()> {
    let storage = DbStorage::open(dir)?;
    match command {
        StorageSubcommands::List => {
            let keys = storage.keys()?;
            if keys.is_empty() {
                tracing::info!("No stored keys");
            }
            for key in keys {
                tracing::info!("{key}");
            }
        }
        StorageSubcommands::Clear(args) => {
            if storage.remove(&args.key)? {
                tracing::info!("Removed {}", args.key);
            } else {
                tracing::info!("{} is not stored", args.key);
            }
        }
    }
    Ok(())
}

/// Runs the `config` subcommands.
///
/// # Errors
///
/// Returns an error if the config cannot be read, serialized or written.
fn run_config(command: &ConfigSubcommands, dir: Option<&Path>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    match command {
        ConfigSubcommands::Show => {
            let config = AppConfig::load(&config_path).context("failed to load config")?;
            let db_path = reelscout_db::resolve_db_path(dir)?;
            tracing::info!("Config file: {}", config_path.display());
            tracing::info!("Database: {}", db_path.display());
            let content =
                toml::to_string_pretty(&config).context("failed to serialize config to TOML")?;
            for line in content.lines() {
                tracing::info!("{line}");
            }
        }
        ConfigSubcommands::Init(args) => {
            if config_path.exists() && !args.force {
                bail!(
                    "config already exists: {} (use --force to overwrite)",
                    config_path.display()
                );
            }
            AppConfig::default().save(&config_path)?;
            tracing::info!("Wrote {}", config_path.display());
        }
    }
    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, config: &AppConfig, dir: Option<&Path>) -> Result<()> {
    let kind = if args.people {
        EntityKind::People
    } else {
        EntityKind::Movies
    };
    let mut session = SearchSession::new(kind, config.search.sort_order()?);
    if let Some(query) = &args.query {
        session.set_draft(query.as_str());
        session.commit();
    }

    let cache = build_query_cache(&config.tmdb)?;
    let ages = AgeLoader::new(cache.api(), config.tmdb.language.clone())
        .with_batch_size(config.search.age_batch_size);
    let mut store = open_store(dir);

    tui::run_search_page(cache, ages, &mut store, session).await
}

/// Initializes tracing. `quiet` discards formatted output.
fn init_tracing(quiet: bool) {
    let writer = if quiet {
        BoxMakeWriter::new(io::sink)
    } else {
        BoxMakeWriter::new(io::stdout)
    };

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        clap_complete::generate(args.shell, &mut Cli::command(), "reelscout", &mut io::stdout());
        return Ok(());
    }

    // The TUI owns the terminal; log lines would corrupt the screen.
    init_tracing(matches!(cli.command, Commands::Browse(_)));

    let dir = cli.dir.as_deref();
    match &cli.command {
        Commands::Genres => run_genres(&load_config(dir)?).await,
        Commands::Search(cmd) => {
            let config = load_config(dir)?;
            match &cmd.command {
                SearchSubcommands::Movies(args) => run_search_movies(args, &config).await,
                SearchSubcommands::People(args) => run_search_people(args, &config).await,
            }
        }
        Commands::Person(args) => run_person(args, &load_config(dir)?).await,
        Commands::Favorites(cmd) => {
            run_favorites(&cmd.command, dir);
            Ok(())
        }
        Commands::Review(args) => {
            run_review(args, dir);
            Ok(())
        }
        Commands::Reviews => {
            run_reviews(dir);
            Ok(())
        }
        Commands::Playlist(cmd) => run_playlist(&cmd.command, dir),
        Commands::Storage(cmd) => run_storage(&cmd.command, dir),
        Commands::Config(cmd) => run_config(&cmd.command, dir),
        Commands::Browse(args) => run_browse(args, &load_config(dir)?, dir).await,
        Commands::Completions(_) => Ok(()),
    }
}
