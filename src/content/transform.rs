//! Post body rendering and reading time estimation

use super::post::ContentBlock;
use super::richtext;
use crate::helpers::html_escape;

/// Reading speed used for the reading time estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// Markup produced from a post body.
///
/// Only this module can build one, so any value of this type has gone
/// through the escaping rich text conversion and may be inserted into a
/// page without further escaping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument(String);

impl RenderedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Render every content block as `<h3>heading</h3>` followed by its body
pub fn render(content: &[ContentBlock]) -> RenderedDocument {
    let html = content.iter().fold(String::new(), |mut acc, block| {
        acc.push_str("<h3>");
        acc.push_str(&html_escape(&block.heading));
        acc.push_str("</h3>");
        acc.push_str(&richtext::as_html(&block.body));
        acc
    });
    RenderedDocument(html)
}

/// Total words across headings and plain-text bodies
pub fn word_count(content: &[ContentBlock]) -> usize {
    content
        .iter()
        .map(|block| {
            block.heading.split_whitespace().count()
                + richtext::as_text(&block.body).split_whitespace().count()
        })
        .sum()
}

/// Estimated reading time in whole minutes, rounded up
pub fn estimate_reading_time(content: &[ContentBlock]) -> usize {
    word_count(content).div_ceil(WORDS_PER_MINUTE)
}
