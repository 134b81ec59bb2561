//! Post models as returned by the content source

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::richtext::RichTextBlock;

lazy_static! {
    static ref KEY_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,127}$").unwrap();
}

/// Rejected route parameter for a post key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid post key: {0:?}")]
pub struct InvalidKey(pub String);

/// Unique, URL-safe key of a post (the document UID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostKey(String);

impl PostKey {
    /// Validate a raw route parameter
    pub fn parse(raw: &str) -> Result<Self, InvalidKey> {
        if KEY_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidKey(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PostKey {
    type Error = InvalidKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostKey> for String {
    fn from(key: PostKey) -> Self {
        key.0
    }
}

impl fmt::Display for PostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque locator of the next page, handed back to the source untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub key: PostKey,
    pub published: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// A full post as shown on its own page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub published: Option<DateTime<Utc>>,
    pub title: String,
    pub banner_url: String,
    pub author: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// One section of a post body: a heading followed by rich text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub heading: String,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

/// One page of query results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPage {
    pub items: Vec<PostSummary>,
    pub next_cursor: Option<Cursor>,
}
