//! TUI module for interactive terminal interfaces.
//!
//! Uses `ratatui` + `crossterm` for rendering.

/// Movie and people search page.
pub mod search_page;

pub use search_page::run_search_page;
