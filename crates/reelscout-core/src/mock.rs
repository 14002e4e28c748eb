//! In-memory `TmdbApi` used by the loader and cache tests.
#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};
use reelscout_api::tmdb::{
    SearchMovieParams, SearchPersonParams, TmdbApi, TmdbGenre, TmdbGenreList,
    TmdbMovieSearchResult, TmdbPaginated, TmdbPersonDetails, TmdbPersonMovieCredits,
    TmdbPersonSearchResult, TmdbSearchMovieResponse, TmdbSearchPersonResponse,
};

use crate::age::CancellationToken;

/// Canned TMDB responses with call accounting.
#[derive(Debug, Default)]
pub struct MockTmdbApi {
    birthdays: HashMap<u64, Option<String>>,
    failing: HashSet<u64>,
    genres: Vec<TmdbGenre>,
    movies: Vec<TmdbMovieSearchResult>,
    people: Vec<TmdbPersonSearchResult>,
    failures_left: AtomicUsize,
    cancel_after: Option<(usize, CancellationToken)>,
    detail_calls: Mutex<Vec<u64>>,
    search_calls: AtomicUsize,
    genre_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTmdbApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_birthday(mut self, id: u64, birthday: Option<&str>) -> Self {
        self.birthdays.insert(id, birthday.map(String::from));
        self
    }

    pub fn with_failing_person(mut self, id: u64) -> Self {
        self.failing.insert(id);
        self
    }

    pub fn with_genres(mut self, genres: &[(u32, &str)]) -> Self {
        self.genres = genres
            .iter()
            .map(|&(id, name)| TmdbGenre {
                id,
                name: String::from(name),
            })
            .collect();
        self
    }

    pub fn with_movies(mut self, movies: Vec<TmdbMovieSearchResult>) -> Self {
        self.movies = movies;
        self
    }

    pub fn with_people(mut self, people: Vec<TmdbPersonSearchResult>) -> Self {
        self.people = people;
        self
    }

    /// Fails the next `n` calls of any endpoint.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// Cancels `token` when the `n`th person details call starts.
    pub fn cancel_on_call(mut self, n: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((n, token));
        self
    }

    pub fn detail_calls(&self) -> Vec<u64> {
        self.detail_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn genre_calls(&self) -> usize {
        self.genre_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Marks a request in flight across one scheduler yield.
    async fn simulate_latency(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn page<T: Clone>(items: &[T], page: u32) -> TmdbPaginated<T> {
        TmdbPaginated {
            page,
            results: items.to_vec(),
            total_pages: 1,
            total_results: u32::try_from(items.len()).unwrap(),
        }
    }
}

impl TmdbApi for MockTmdbApi {
    async fn movie_genres(&self, _language: &str) -> Result<TmdbGenreList> {
        self.genre_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.take_failure() {
            bail!("mock genre failure");
        }
        Ok(TmdbGenreList {
            genres: self.genres.clone(),
        })
    }

    async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbSearchMovieResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.take_failure() {
            bail!("mock search failure");
        }
        Ok(Self::page(&self.movies, params.page))
    }

    async fn search_person(&self, params: &SearchPersonParams) -> Result<TmdbSearchPersonResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.take_failure() {
            bail!("mock search failure");
        }
        Ok(Self::page(&self.people, params.page))
    }

    async fn person_details(&self, person_id: u64, _language: &str) -> Result<TmdbPersonDetails> {
        let call_no = {
            let mut calls = self.detail_calls.lock().unwrap();
            calls.push(person_id);
            calls.len()
        };
        if let Some((n, token)) = &self.cancel_after
            && call_no == *n
        {
            token.cancel();
        }
        self.simulate_latency().await;
        if self.failing.contains(&person_id) || self.take_failure() {
            bail!("mock person {person_id} failure");
        }
        Ok(TmdbPersonDetails {
            id: person_id,
            name: format!("Person {person_id}"),
            birthday: self.birthdays.get(&person_id).cloned().flatten(),
            ..TmdbPersonDetails::default()
        })
    }

    async fn person_movie_credits(
        &self,
        person_id: u64,
        _language: &str,
    ) -> Result<TmdbPersonMovieCredits> {
        self.simulate_latency().await;
        if self.take_failure() {
            bail!("mock credits failure");
        }
        Ok(TmdbPersonMovieCredits {
            id: person_id,
            cast: Vec::new(),
        })
    }
}
