//! Search page state: draft term, committed query, entity type, paging,
//! sort and genre controls.

use anyhow::Result;

use crate::query::EntityKind;
use crate::sort::{MovieSortKey, PersonSortKey, SortOrder};

/// State behind the search page.
///
/// Any change to the committed query or a filter control resets the page
/// to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    draft: String,
    query: String,
    kind: EntityKind,
    page: u32,
    sort_by: Option<String>,
    order: SortOrder,
    genre: Option<i64>,
    total_pages: Option<u32>,
}

impl SearchSession {
    /// Creates a session on page 1 with no query.
    #[must_use]
    pub fn new(kind: EntityKind, order: SortOrder) -> Self {
        Self {
            draft: String::new(),
            query: String::new(),
            kind,
            page: 1,
            sort_by: None,
            order,
            genre: None,
            total_pages: None,
        }
    }

    /// Text typed into the search box, not yet committed.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replaces the draft text.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Appends a character to the draft.
    pub fn push_draft(&mut self, c: char) {
        self.draft.push(c);
    }

    /// Removes the last draft character.
    pub fn pop_draft(&mut self) {
        self.draft.pop();
    }

    /// Committed, trimmed search term.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Commits the trimmed draft as the query and returns to page 1.
    /// Returns whether the query changed.
    pub fn commit(&mut self) -> bool {
        let term = self.draft.trim();
        let changed = term != self.query;
        if changed {
            self.query = String::from(term);
            self.total_pages = None;
        }
        self.page = 1;
        changed
    }

    /// Searched entity type.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Switches the entity type. A sort key the new type does not know is
    /// cleared.
    pub fn set_kind(&mut self, kind: EntityKind) {
        if kind == self.kind {
            return;
        }
        self.kind = kind;
        if self
            .sort_by
            .as_deref()
            .is_some_and(|key| !sort_key_valid(kind, key))
        {
            self.sort_by = None;
        }
        self.reset_paging();
    }

    /// Flips between movies and people.
    pub fn toggle_kind(&mut self) {
        self.set_kind(self.kind.toggled());
    }

    /// Sort key wire name, `None` when unsorted.
    #[must_use]
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    /// Sets the sort key by wire name. An empty name clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not apply to the current entity type.
    pub fn set_sort_by(&mut self, key: Option<&str>) -> Result<()> {
        let key = key.map(str::trim).filter(|k| !k.is_empty());
        if let Some(key) = key {
            match self.kind {
                EntityKind::Movies => {
                    key.parse::<MovieSortKey>()?;
                }
                EntityKind::People => {
                    key.parse::<PersonSortKey>()?;
                }
            }
        }
        let key = key.map(String::from);
        if key != self.sort_by {
            self.sort_by = key;
            self.reset_paging();
        }
        Ok(())
    }

    /// Steps to the next sort key of the current type, wrapping through
    /// "unsorted".
    pub fn cycle_sort(&mut self) {
        let keys: Vec<&'static str> = match self.kind {
            EntityKind::Movies => MovieSortKey::ALL.iter().map(|k| k.as_str()).collect(),
            EntityKind::People => PersonSortKey::ALL.iter().map(|k| k.as_str()).collect(),
        };
        let next = match self.sort_by.as_deref() {
            None => keys.first().copied(),
            Some(current) => keys
                .iter()
                .position(|k| *k == current)
                .and_then(|i| keys.get(i.saturating_add(1)))
                .copied(),
        };
        self.sort_by = next.map(String::from);
        self.reset_paging();
    }

    /// Movie sort key, when the session sorts movies.
    #[must_use]
    pub fn movie_sort_key(&self) -> Option<MovieSortKey> {
        match self.kind {
            EntityKind::Movies => self.sort_by.as_deref()?.parse().ok(),
            EntityKind::People => None,
        }
    }

    /// Person sort key, when the session sorts people.
    #[must_use]
    pub fn person_sort_key(&self) -> Option<PersonSortKey> {
        match self.kind {
            EntityKind::People => self.sort_by.as_deref()?.parse().ok(),
            EntityKind::Movies => None,
        }
    }

    /// Sort direction.
    #[must_use]
    pub const fn order(&self) -> SortOrder {
        self.order
    }

    /// Sets the sort direction.
    pub fn set_order(&mut self, order: SortOrder) {
        if order != self.order {
            self.order = order;
            self.reset_paging();
        }
    }

    /// Flips the sort direction.
    pub fn toggle_order(&mut self) {
        self.set_order(self.order.toggled());
    }

    /// Genre filter, `None` for all genres.
    #[must_use]
    pub const fn genre(&self) -> Option<i64> {
        self.genre
    }

    /// Sets the genre filter. Non-positive ids mean all genres.
    pub fn set_genre(&mut self, genre: Option<i64>) {
        let genre = genre.filter(|&id| id > 0);
        if genre != self.genre {
            self.genre = genre;
            self.reset_paging();
        }
    }

    /// Current page, starting at 1.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total pages reported by the last response, if any.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Records the page count of the latest response.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = Some(total_pages);
        self.page = self.clamp_page(self.page);
    }

    /// Jumps to page `page`, clamped into the known range.
    pub fn set_page(&mut self, page: u32) {
        self.page = self.clamp_page(page);
    }

    /// Moves forward one page. Returns whether the page changed.
    pub fn next_page(&mut self) -> bool {
        let before = self.page;
        self.set_page(self.page.saturating_add(1));
        self.page != before
    }

    /// Moves back one page. Returns whether the page changed.
    pub fn prev_page(&mut self) -> bool {
        let before = self.page;
        self.set_page(self.page.saturating_sub(1));
        self.page != before
    }

    /// True exactly when people are sorted by age.
    #[must_use]
    pub fn needs_ages(&self) -> bool {
        self.person_sort_key() == Some(PersonSortKey::Age)
    }

    fn clamp_page(&self, page: u32) -> u32 {
        match self.total_pages {
            Some(total) if total > 0 => page.clamp(1, total),
            _ => page.max(1),
        }
    }

    fn reset_paging(&mut self) {
        self.page = 1;
    }
}

fn sort_key_valid(kind: EntityKind, key: &str) -> bool {
    match kind {
        EntityKind::Movies => key.parse::<MovieSortKey>().is_ok(),
        EntityKind::People => key.parse::<PersonSortKey>().is_ok(),
    }
}
