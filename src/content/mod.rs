//! Content module - post models, rich text and body rendering

mod post;
pub mod richtext;
mod transform;

pub use post::{ContentBlock, Cursor, InvalidKey, PostDetail, PostKey, PostPage, PostSummary};
pub use richtext::{BlockKind, Oembed, RichTextBlock, Span, SpanData, SpanKind};
pub use transform::{
    estimate_reading_time, render, word_count, RenderedDocument, WORDS_PER_MINUTE,
};
