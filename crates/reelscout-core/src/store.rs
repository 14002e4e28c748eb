//! Favorites, reviews and playlists persisted to [`LocalStorage`].
//!
//! Playlist changes go through pure transition functions that return a new
//! collection; [`MoviesStore`] applies them and writes the whole collection
//! back after every change.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::storage::LocalStorage;

/// Storage key of the playlist collection.
pub const PLAYLISTS_KEY: &str = "rmdb_playlists_v1";
/// Storage key of the favorite movie ids.
pub const FAVORITES_KEY: &str = "rmdb_favorites_v1";
/// Storage key of the review map.
pub const REVIEWS_KEY: &str = "rmdb_reviews_v1";
/// Name given to playlists created without one.
pub const DEFAULT_PLAYLIST_NAME: &str = "New Playlist";

/// A user-named, ordered collection of movie ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Creation-time identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Movie ids, no duplicates.
    #[serde(default)]
    pub movie_ids: Vec<u64>,
}

// --- Pure transitions ---

/// Returns an id derived from `now_millis` that no playlist uses yet.
#[must_use]
pub fn generate_playlist_id(playlists: &[Playlist], now_millis: u64) -> String {
    let mut candidate = now_millis;
    loop {
        let id = candidate.to_string();
        if playlists.iter().all(|p| p.id != id) {
            return id;
        }
        candidate = candidate.wrapping_add(1);
    }
}

/// Appends a new, empty playlist. A blank name falls back to
/// [`DEFAULT_PLAYLIST_NAME`].
#[must_use]
pub fn create_playlist(playlists: &[Playlist], name: &str, now_millis: u64) -> Vec<Playlist> {
    let name = name.trim();
    let mut next = playlists.to_vec();
    next.push(Playlist {
        id: generate_playlist_id(playlists, now_millis),
        name: if name.is_empty() {
            String::from(DEFAULT_PLAYLIST_NAME)
        } else {
            String::from(name)
        },
        movie_ids: Vec::new(),
    });
    next
}

/// Removes the playlist with `id`.
#[must_use]
pub fn delete_playlist(playlists: &[Playlist], id: &str) -> Vec<Playlist> {
    playlists.iter().filter(|p| p.id != id).cloned().collect()
}

/// Renames the playlist with `id`, keeping its id and contents.
#[must_use]
pub fn rename_playlist(playlists: &[Playlist], id: &str, name: &str) -> Vec<Playlist> {
    map_playlist(playlists, id, |p| p.name = String::from(name))
}

/// Appends `movie_id` unless the playlist already holds it.
#[must_use]
pub fn add_movie(playlists: &[Playlist], id: &str, movie_id: u64) -> Vec<Playlist> {
    map_playlist(playlists, id, |p| {
        if !p.movie_ids.contains(&movie_id) {
            p.movie_ids.push(movie_id);
        }
    })
}

/// Removes `movie_id` from the playlist.
#[must_use]
pub fn remove_movie(playlists: &[Playlist], id: &str, movie_id: u64) -> Vec<Playlist> {
    map_playlist(playlists, id, |p| p.movie_ids.retain(|&m| m != movie_id))
}

/// Empties the playlist, keeping its id and name.
#[must_use]
pub fn clear_playlist(playlists: &[Playlist], id: &str) -> Vec<Playlist> {
    map_playlist(playlists, id, |p| p.movie_ids.clear())
}

fn map_playlist(playlists: &[Playlist], id: &str, f: impl Fn(&mut Playlist)) -> Vec<Playlist> {
    playlists
        .iter()
        .cloned()
        .map(|mut p| {
            if p.id == id {
                f(&mut p);
            }
            p
        })
        .collect()
}

// --- Store ---

/// Movie collections owned by one user, persisted after every change.
///
/// Storage failures never surface to the caller: they are logged at
/// `debug` and the in-memory state stays authoritative.
#[derive(Debug)]
pub struct MoviesStore<S: LocalStorage> {
    storage: S,
    playlists: Vec<Playlist>,
    favorites: Vec<u64>,
    reviews: BTreeMap<u64, String>,
}

impl<S: LocalStorage> MoviesStore<S> {
    /// Reads all collections from `storage`. Missing or malformed values
    /// start out empty.
    pub fn load(storage: S) -> Self {
        let playlists = load_json(&storage, PLAYLISTS_KEY);
        let favorites = load_json(&storage, FAVORITES_KEY);
        let reviews = load_json(&storage, REVIEWS_KEY);
        Self {
            storage,
            playlists,
            favorites,
            reviews,
        }
    }

    /// Returns the backing storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    // --- Playlists ---

    /// Returns every playlist in creation order.
    #[must_use]
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Returns the playlist with `id`.
    #[must_use]
    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    /// Creates a playlist and returns its id.
    pub fn create_playlist(&mut self, name: &str) -> String {
        self.create_playlist_at(name, now_millis())
    }

    /// Creates a playlist with an id derived from `now_millis`.
    pub fn create_playlist_at(&mut self, name: &str, now_millis: u64) -> String {
        let next = create_playlist(&self.playlists, name, now_millis);
        let id = next.last().map(|p| p.id.clone()).unwrap_or_default();
        self.replace_playlists(next);
        id
    }

    /// Deletes a playlist. Returns `false` when the id is unknown.
    pub fn delete_playlist(&mut self, id: &str) -> bool {
        self.update_playlists(id, |all| delete_playlist(all, id))
    }

    /// Renames a playlist. Returns `false` when the id is unknown.
    pub fn rename_playlist(&mut self, id: &str, name: &str) -> bool {
        self.update_playlists(id, |all| rename_playlist(all, id, name))
    }

    /// Adds a movie to a playlist. Returns `false` when the id is unknown.
    pub fn add_to_playlist(&mut self, id: &str, movie_id: u64) -> bool {
        self.update_playlists(id, |all| add_movie(all, id, movie_id))
    }

    /// Removes a movie from a playlist. Returns `false` when the id is unknown.
    pub fn remove_from_playlist(&mut self, id: &str, movie_id: u64) -> bool {
        self.update_playlists(id, |all| remove_movie(all, id, movie_id))
    }

    /// Empties a playlist. Returns `false` when the id is unknown.
    pub fn clear_playlist(&mut self, id: &str) -> bool {
        self.update_playlists(id, |all| clear_playlist(all, id))
    }

    fn update_playlists(&mut self, id: &str, f: impl FnOnce(&[Playlist]) -> Vec<Playlist>) -> bool {
        if self.playlist(id).is_none() {
            return false;
        }
        let next = f(&self.playlists);
        self.replace_playlists(next);
        true
    }

    fn replace_playlists(&mut self, next: Vec<Playlist>) {
        self.playlists = next;
        save_json(&self.storage, PLAYLISTS_KEY, &self.playlists);
    }

    // --- Favorites ---

    /// Returns favorite movie ids in insertion order.
    #[must_use]
    pub fn favorites(&self) -> &[u64] {
        &self.favorites
    }

    /// Returns whether the movie is a favorite.
    #[must_use]
    pub fn is_favorite(&self, movie_id: u64) -> bool {
        self.favorites.contains(&movie_id)
    }

    /// Marks a movie as favorite. Returns `false` when it already was.
    pub fn add_favorite(&mut self, movie_id: u64) -> bool {
        if self.is_favorite(movie_id) {
            return false;
        }
        let mut next = self.favorites.clone();
        next.push(movie_id);
        self.favorites = next;
        save_json(&self.storage, FAVORITES_KEY, &self.favorites);
        true
    }

    /// Unmarks a favorite. Returns `false` when it was not one.
    pub fn remove_favorite(&mut self, movie_id: u64) -> bool {
        if !self.is_favorite(movie_id) {
            return false;
        }
        self.favorites = self
            .favorites
            .iter()
            .copied()
            .filter(|&m| m != movie_id)
            .collect();
        save_json(&self.storage, FAVORITES_KEY, &self.favorites);
        true
    }

    /// Toggles a favorite and returns the new state.
    pub fn toggle_favorite(&mut self, movie_id: u64) -> bool {
        if self.remove_favorite(movie_id) {
            false
        } else {
            self.add_favorite(movie_id)
        }
    }

    // --- Reviews ---

    /// Stores or replaces the review text for a movie.
    pub fn add_review(&mut self, movie_id: u64, text: &str) {
        let mut next = self.reviews.clone();
        next.insert(movie_id, String::from(text));
        self.reviews = next;
        save_json(&self.storage, REVIEWS_KEY, &self.reviews);
    }

    /// Returns the review for a movie.
    #[must_use]
    pub fn review(&self, movie_id: u64) -> Option<&str> {
        self.reviews.get(&movie_id).map(String::as_str)
    }

    /// Returns every review ordered by movie id.
    #[must_use]
    pub const fn reviews(&self) -> &BTreeMap<u64, String> {
        &self.reviews
    }
}

fn load_json<T: DeserializeOwned + Default>(storage: &impl LocalStorage, key: &str) -> T {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::debug!(key, error = %e, "local storage read failed");
            return T::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::debug!(key, error = %e, "discarding malformed stored value");
        T::default()
    })
}

fn save_json<T: Serialize + ?Sized>(storage: &impl LocalStorage, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(anyhow::Error::from)
        .and_then(|raw| storage.set_item(key, &raw));
    if let Err(e) = result {
        tracing::debug!(key, error = %e, "local storage write failed");
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
