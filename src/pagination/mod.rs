//! Incremental "load more" pagination over a content source
//!
//! The listing holds a [`PaginationState`] seeded from a first page that
//! was fetched when the page was loaded. [`PaginationController::load_more`]
//! follows the stored cursor and appends the next page. Calls are expected
//! one at a time; the controller takes `&mut self` so overlapping calls on
//! the same state cannot be expressed.

use serde::Serialize;

use crate::content::{Cursor, PostPage, PostSummary};
use crate::source::{ContentSource, SourceError};

/// Posts loaded so far plus the cursor to the next page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaginationState {
    pub items: Vec<PostSummary>,
    pub next_cursor: Option<Cursor>,
}

impl PaginationState {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

impl From<PostPage> for PaginationState {
    fn from(page: PostPage) -> Self {
        Self {
            items: page.items,
            next_cursor: page.next_cursor,
        }
    }
}

/// Outcome of a single `load_more` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    /// A page was fetched and this many items were appended
    Appended(usize),
    /// No cursor was stored; nothing was fetched
    Exhausted,
}

/// Drives [`PaginationState`] forward against a source
pub struct PaginationController<'a> {
    source: &'a dyn ContentSource,
    state: PaginationState,
    pages_loaded: usize,
}

impl<'a> PaginationController<'a> {
    /// Start from an already fetched first page
    pub fn new(source: &'a dyn ContentSource, first_page: PostPage) -> Self {
        Self {
            source,
            state: first_page.into(),
            pages_loaded: 1,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn into_state(self) -> PaginationState {
        self.state
    }

    /// Pages held in the state, including the first one
    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// Fetch the page at the stored cursor and append it.
    ///
    /// Without a cursor this is a no-op and no request is made. On error
    /// the state is left exactly as it was, so the call can be retried.
    pub async fn load_more(&mut self) -> Result<LoadMore, SourceError> {
        let cursor = match &self.state.next_cursor {
            Some(cursor) => cursor.clone(),
            None => return Ok(LoadMore::Exhausted),
        };

        let page = self.source.query_page(&cursor).await?;
        let appended = page.items.len();
        self.state.items.extend(page.items);
        self.state.next_cursor = page.next_cursor;
        self.pages_loaded += 1;

        tracing::debug!(
            appended,
            total = self.state.items.len(),
            has_more = self.state.has_more(),
            "loaded next page"
        );
        Ok(LoadMore::Appended(appended))
    }

    /// Call `load_more` until `pages` pages are held, the source runs out,
    /// or a fetch fails. A failure is logged and leaves the state as it was
    /// after the last successful page.
    pub async fn load_pages(&mut self, pages: usize) -> Option<SourceError> {
        while self.pages_loaded < pages {
            match self.load_more().await {
                Ok(LoadMore::Appended(_)) => {}
                Ok(LoadMore::Exhausted) => break,
                Err(e) => {
                    tracing::warn!(error = %e, pages_loaded = self.pages_loaded, "load more failed");
                    return Some(e);
                }
            }
        }
        None
    }
}
