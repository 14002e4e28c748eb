//! Application configuration module.
//!
//! Manages the TOML config file holding TMDB request settings and
//! search defaults.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, SearchConfig, TmdbConfig};
pub use paths::resolve_config_path;
