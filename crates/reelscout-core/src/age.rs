//! Person ages for the age sort.
//!
//! Search results carry no birthday, so sorting people by age needs one
//! `person/{id}` request per person. [`AgeLoader`] fetches the missing ones
//! in small concurrent batches, caches every answer for the session and
//! publishes the ages of the requested ids once all batches are done.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Datelike, NaiveDate};
use futures::future::join_all;
use reelscout_api::tmdb::TmdbApi;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::instrument;

/// Person id → age in years, `None` when unknown.
pub type AgeMap = HashMap<u64, Option<i32>>;

/// Number of person detail requests in flight per batch.
pub const DEFAULT_AGE_BATCH_SIZE: usize = 4;

/// Completed years between `birthday` and `today`.
#[must_use]
pub fn age_on(birthday: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year().saturating_sub(birthday.year());
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        years.saturating_sub(1)
    } else {
        years
    }
}

/// Age for a `YYYY-MM-DD` birthday. Missing or unparseable birthdays give
/// `None`.
#[must_use]
pub fn age_from_birthday(birthday: Option<&str>, today: NaiveDate) -> Option<i32> {
    let birthday = NaiveDate::parse_from_str(birthday?.trim(), "%Y-%m-%d").ok()?;
    Some(age_on(birthday, today))
}

/// Cooperative cancellation flag shared between a loader run and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Session-wide age cache. Entries are never evicted.
#[derive(Debug, Default)]
pub struct AgeCache {
    ages: AgeMap,
}

impl AgeCache {
    /// Ids from `ids` without a cached entry, in input order.
    #[must_use]
    pub fn missing(&self, ids: &[u64]) -> Vec<u64> {
        ids.iter()
            .copied()
            .filter(|id| !self.ages.contains_key(id))
            .collect()
    }

    /// Records the age of a person.
    pub fn insert(&mut self, id: u64, age: Option<i32>) {
        self.ages.insert(id, age);
    }

    /// Ages of `ids`, with `None` for ids not in the cache.
    #[must_use]
    pub fn snapshot(&self, ids: &[u64]) -> AgeMap {
        ids.iter()
            .map(|&id| (id, self.ages.get(&id).copied().flatten()))
            .collect()
    }

    /// Number of cached people.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ages.len()
    }

    /// Returns whether nothing is cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }
}

/// Batched person age loader.
#[derive(Debug)]
pub struct AgeLoader<A> {
    api: Arc<A>,
    cache: Arc<Mutex<AgeCache>>,
    language: String,
    batch_size: usize,
}

impl<A> Clone for AgeLoader<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            cache: Arc::clone(&self.cache),
            language: self.language.clone(),
            batch_size: self.batch_size,
        }
    }
}

impl<A: TmdbApi + Sync + 'static> AgeLoader<A> {
    /// Creates a loader with an empty cache and the default batch size.
    pub fn new(api: Arc<A>, language: impl Into<String>) -> Self {
        Self {
            api,
            cache: Arc::new(Mutex::new(AgeCache::default())),
            language: language.into(),
            batch_size: DEFAULT_AGE_BATCH_SIZE,
        }
    }

    /// Sets the number of concurrent requests per batch (at least 1).
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Returns the shared cache.
    #[must_use]
    pub fn cache(&self) -> Arc<Mutex<AgeCache>> {
        Arc::clone(&self.cache)
    }

    /// Resolves the ages of `ids`.
    ///
    /// Ids already cached are not requested again. The rest are fetched in
    /// sequential batches; a failed request counts as an unknown age.
    /// Returns `None` without publishing anything once `cancel` is set.
    #[instrument(skip_all, fields(requested = ids.len()))]
    pub async fn load(
        &self,
        ids: &[u64],
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Option<AgeMap> {
        let mut seen = HashSet::new();
        let requested: Vec<u64> = ids
            .iter()
            .copied()
            .filter(|&id| id != 0 && seen.insert(id))
            .collect();

        let missing = self.cache.lock().await.missing(&requested);
        tracing::debug!(missing = missing.len(), "resolving person ages");

        for batch in missing.chunks(self.batch_size) {
            let results = join_all(batch.iter().map(|&id| self.fetch_age(id, today))).await;
            if cancel.is_cancelled() {
                tracing::debug!("age loading cancelled, discarding batch");
                return None;
            }
            let mut cache = self.cache.lock().await;
            for (id, age) in results {
                cache.insert(id, age);
            }
        }

        let ages = self.cache.lock().await.snapshot(&requested);
        if cancel.is_cancelled() {
            return None;
        }
        Some(ages)
    }

    /// Runs [`Self::load`] on a spawned task.
    pub fn spawn(
        &self,
        ids: Vec<u64>,
        today: NaiveDate,
        cancel: CancellationToken,
    ) -> JoinHandle<Option<AgeMap>> {
        let loader = self.clone();
        tokio::spawn(async move { loader.load(&ids, today, &cancel).await })
    }

    async fn fetch_age(&self, id: u64, today: NaiveDate) -> (u64, Option<i32>) {
        match self.api.person_details(id, &self.language).await {
            Ok(details) => (id, age_from_birthday(details.birthday.as_deref(), today)),
            Err(e) => {
                tracing::debug!(person_id = id, error = %e, "person details failed, age unknown");
                (id, None)
            }
        }
    }
}
