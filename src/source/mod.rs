//! Content source adapters
//!
//! A [`ContentSource`] is the only way the rest of the crate talks to the
//! headless content API. It is constructed once and passed in, so tests
//! can substitute [`MemorySource`] for the HTTP-backed [`PrismicSource`].

mod memory;
mod prismic;

pub use memory::{FixturePost, MemorySource};
pub use prismic::PrismicSource;

use thiserror::Error;

use crate::content::{Cursor, PostDetail, PostKey, PostPage};

/// Failures surfaced by a content source. Never retried locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("content source unavailable: {0}")]
    Unavailable(String),

    #[error("no post found for key {0:?}")]
    NotFound(String),

    #[error("malformed response from content source: {0}")]
    Decode(String),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }
}

/// Paginated read access to posts
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the first page of posts
    async fn query_first_page(&self, page_size: usize) -> Result<PostPage, SourceError>;

    /// Fetch the page a cursor points at
    async fn query_page(&self, cursor: &Cursor) -> Result<PostPage, SourceError>;

    /// Look up a single post by key
    async fn query_by_key(&self, key: &PostKey) -> Result<PostDetail, SourceError>;

    fn name(&self) -> &'static str;
}
