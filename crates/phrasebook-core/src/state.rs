use std::sync::Arc;

use phrasebook_types::{PageView, Phrase};

use crate::error::{JumpError, PaginationError};
use crate::filter::filter_indices;
use crate::pagination::{self, Page};
use crate::store::PhraseStore;

/// Search and pagination state over a shared phrase store
pub struct BrowseState {
    store: Arc<PhraseStore>,
    page_size: usize,
    /// What the user typed, updated on every input
    search_term: String,
    /// Term the current matches were computed for
    settled_term: String,
    matches: Vec<usize>,
    current_page: usize,
}

impl BrowseState {
    pub fn new(store: Arc<PhraseStore>, page_size: usize) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }

        let matches = (0..store.len()).collect();
        Ok(Self {
            store,
            page_size,
            search_term: String::new(),
            settled_term: String::new(),
            matches,
            current_page: 1,
        })
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn settled_term(&self) -> &str {
        &self.settled_term
    }

    /// Record raw input without filtering
    pub fn set_search_input(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Filter with a settled term and go back to the first page
    pub fn apply_search(&mut self, term: &str) {
        self.matches = filter_indices(self.store.phrases(), term);
        self.settled_term = term.to_string();
        self.current_page = 1;
        tracing::debug!("Search {:?} matched {} phrases", term, self.matches.len());
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.matches.len(), self.page_size).unwrap_or(1)
    }

    fn page(&self) -> Page {
        // page_size was checked in new()
        pagination::paginate(self.matches.len(), self.page_size, self.current_page).unwrap_or(
            Page {
                range: 0..0,
                total_pages: 1,
                current_page: 1,
                adjusted: false,
            },
        )
    }

    /// Move to `page`, clamped into range. Returns the page now shown.
    pub fn set_page(&mut self, page: usize) -> usize {
        if let Ok(resolved) = pagination::paginate(self.matches.len(), self.page_size, page) {
            self.current_page = resolved.current_page;
        }
        self.current_page
    }

    pub fn first_page(&mut self) -> usize {
        self.set_page(1)
    }

    pub fn previous_page(&mut self) -> usize {
        self.set_page(self.current_page.saturating_sub(1))
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.current_page + 1)
    }

    pub fn last_page(&mut self) -> usize {
        self.set_page(self.total_pages())
    }

    /// Handle "go to page" input. Invalid input leaves the state untouched.
    pub fn jump_to(&mut self, input: &str) -> Result<usize, JumpError> {
        let page = pagination::parse_page_jump(input, self.total_pages())?;
        Ok(self.set_page(page))
    }

    /// Phrases on the current page
    pub fn visible(&self) -> Vec<&Phrase> {
        self.page()
            .slice(&self.matches)
            .iter()
            .filter_map(|&i| self.store.get(i))
            .collect()
    }

    /// Card `index` (0-based) of the current page
    pub fn phrase_on_page(&self, index: usize) -> Option<&Phrase> {
        self.page()
            .slice(&self.matches)
            .get(index)
            .and_then(|&i| self.store.get(i))
    }

    pub fn view(&self, installable: bool) -> PageView {
        let page = self.page();
        PageView {
            search_term: self.search_term.clone(),
            phrases: self.visible().into_iter().cloned().collect(),
            match_count: self.matches.len(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            page_items: pagination::page_items(page.current_page, page.total_pages),
            installable,
        }
    }
}
