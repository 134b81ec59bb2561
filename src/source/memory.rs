//! In-process content source backed by a fixed list of posts

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ContentSource, SourceError};
use crate::content::{ContentBlock, Cursor, PostDetail, PostKey, PostPage, PostSummary};

/// One post in a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct FixturePost {
    pub key: PostKey,
    pub published: Option<DateTime<Utc>>,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub banner_url: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl FixturePost {
    fn summary(&self) -> PostSummary {
        PostSummary {
            key: self.key.clone(),
            published: self.published,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            author: self.author.clone(),
        }
    }

    fn detail(&self) -> PostDetail {
        PostDetail {
            published: self.published,
            title: self.title.clone(),
            banner_url: self.banner_url.clone(),
            author: self.author.clone(),
            content: self.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Fixture {
    posts: Vec<FixturePost>,
}

/// Serves posts from memory, paging with `offset:size` cursors
#[derive(Debug, Default)]
pub struct MemorySource {
    posts: Vec<FixturePost>,
    requests: AtomicUsize,
    fail_with: Mutex<Option<SourceError>>,
}

impl MemorySource {
    pub fn new(posts: Vec<FixturePost>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    /// Load posts from a JSON file of the form `{"posts": [...]}`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {:?}", path))?;
        let fixture: Fixture = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixture {:?}", path))?;
        tracing::debug!("Loaded {} fixture posts from {:?}", fixture.posts.len(), path);
        Ok(Self::new(fixture.posts))
    }

    /// Number of queries answered or failed so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Make every following query fail with `error` (`None` to recover)
    pub fn set_failure(&self, error: Option<SourceError>) {
        if let Ok(mut slot) = self.fail_with.lock() {
            *slot = error;
        }
    }

    fn begin_request(&self) -> Result<(), SourceError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.fail_with.lock() {
            Ok(slot) => match slot.as_ref() {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            },
            Err(_) => Err(SourceError::Unavailable("memory source poisoned".to_string())),
        }
    }

    fn page(&self, offset: usize, size: usize) -> PostPage {
        let size = size.max(1);
        let end = (offset + size).min(self.posts.len());
        let items = self
            .posts
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(FixturePost::summary)
            .collect();
        let next_cursor = if end < self.posts.len() {
            Some(Cursor::new(format!("{}:{}", end, size)))
        } else {
            None
        };
        PostPage { items, next_cursor }
    }
}

#[async_trait::async_trait]
impl ContentSource for MemorySource {
    async fn query_first_page(&self, page_size: usize) -> Result<PostPage, SourceError> {
        self.begin_request()?;
        Ok(self.page(0, page_size))
    }

    async fn query_page(&self, cursor: &Cursor) -> Result<PostPage, SourceError> {
        self.begin_request()?;
        let (offset, size) = cursor
            .as_str()
            .split_once(':')
            .and_then(|(o, s)| Some((o.parse::<usize>().ok()?, s.parse::<usize>().ok()?)))
            .ok_or_else(|| SourceError::Decode(format!("bad cursor {:?}", cursor.as_str())))?;
        Ok(self.page(offset, size))
    }

    async fn query_by_key(&self, key: &PostKey) -> Result<PostDetail, SourceError> {
        self.begin_request()?;
        self.posts
            .iter()
            .find(|p| &p.key == key)
            .map(FixturePost::detail)
            .ok_or_else(|| SourceError::NotFound(key.to_string()))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts(n: usize) -> Vec<FixturePost> {
        (0..n)
            .map(|i| FixturePost {
                key: PostKey::parse(&format!("post-{}", i)).unwrap(),
                published: None,
                title: format!("Post {}", i),
                subtitle: String::new(),
                author: String::new(),
                banner_url: String::new(),
                content: Vec::new(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_pages_through_all_posts() {
        let source = MemorySource::new(posts(3));
        let first = source.query_first_page(2).await.unwrap();
        assert_eq!(first.items.len(), 2);
        let cursor = first.next_cursor.unwrap();
        let second = source.query_page(&cursor).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].title, "Post 2");
        assert!(second.next_cursor.is_none());
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn test_lookup_missing_key() {
        let source = MemorySource::new(posts(1));
        let err = source
            .query_by_key(&PostKey::parse("nope").unwrap())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let source = MemorySource::new(posts(1));
        source.set_failure(Some(SourceError::Unavailable("down".to_string())));
        assert!(source.query_first_page(1).await.is_err());
        source.set_failure(None);
        assert!(source.query_first_page(1).await.is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(
            &path,
            r#"{"posts": [{"key": "hello", "published": null, "title": "Hello"}]}"#,
        )
        .unwrap();
        let source = MemorySource::from_file(&path).unwrap();
        assert_eq!(source.posts.len(), 1);
    }
}
