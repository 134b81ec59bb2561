//! Structured rich text and its conversion to HTML and plain text
//!
//! A rich text field is an ordered list of blocks (paragraphs, headings,
//! list items, images...). Each text block carries its raw text plus a
//! list of spans that decorate character ranges of that text.

use serde::{Deserialize, Serialize};

use crate::helpers::{escape_attr, html_escape, is_safe_href};

/// Kind of a rich text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "heading1")]
    Heading1,
    #[serde(rename = "heading2")]
    Heading2,
    #[serde(rename = "heading3")]
    Heading3,
    #[serde(rename = "heading4")]
    Heading4,
    #[serde(rename = "heading5")]
    Heading5,
    #[serde(rename = "heading6")]
    Heading6,
    #[serde(rename = "preformatted")]
    Preformatted,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "o-list-item")]
    OrderedListItem,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "embed")]
    Embed,
    #[serde(other)]
    Unknown,
}

/// A single rich text block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<Span>,
    /// Image source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Image alt text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oembed: Option<Oembed>,
}

impl RichTextBlock {
    /// Convenience constructor for a plain paragraph
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::text(BlockKind::Paragraph, text)
    }

    /// Text block of any kind without spans
    pub fn text(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            spans: Vec::new(),
            url: None,
            alt: None,
            oembed: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }
}

/// Embedded media description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Oembed {
    pub embed_url: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Kind of an inline span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink,
    Label,
    #[serde(other)]
    Unknown,
}

/// Decoration of the character range `start..end` of a block's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SpanData>,
}

impl Span {
    pub fn new(kind: SpanKind, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind,
            data: None,
        }
    }

    pub fn link(start: usize, end: usize, url: impl Into<String>) -> Self {
        Self {
            start,
            end,
            kind: SpanKind::Hyperlink,
            data: Some(SpanData {
                url: Some(url.into()),
                ..SpanData::default()
            }),
        }
    }
}

/// Extra span payload (link target or label name)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Plain text of a rich text field: text blocks joined by a single space
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .filter_map(|b| b.text.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a rich text field to HTML
///
/// Consecutive list items are grouped into a single `<ul>` / `<ol>`.
/// Blocks of unknown kind are dropped.
pub fn as_html(blocks: &[RichTextBlock]) -> String {
    let mut html = String::new();
    let mut open_list: Option<BlockKind> = None;

    for block in blocks {
        let is_list = matches!(block.kind, BlockKind::ListItem | BlockKind::OrderedListItem);

        if open_list.is_some() && open_list != Some(block.kind) {
            html.push_str(close_list_tag(open_list));
            open_list = None;
        }
        if is_list && open_list.is_none() {
            html.push_str(if block.kind == BlockKind::ListItem {
                "<ul>"
            } else {
                "<ol>"
            });
            open_list = Some(block.kind);
        }

        html.push_str(&block_html(block));
    }

    html.push_str(close_list_tag(open_list));
    html
}

fn close_list_tag(kind: Option<BlockKind>) -> &'static str {
    match kind {
        Some(BlockKind::ListItem) => "</ul>",
        Some(BlockKind::OrderedListItem) => "</ol>",
        _ => "",
    }
}

fn block_html(block: &RichTextBlock) -> String {
    let inner = || serialize_spans(block.text.as_deref().unwrap_or(""), &block.spans);

    match block.kind {
        BlockKind::Paragraph => format!("<p>{}</p>", inner()),
        BlockKind::Heading1 => format!("<h1>{}</h1>", inner()),
        BlockKind::Heading2 => format!("<h2>{}</h2>", inner()),
        BlockKind::Heading3 => format!("<h3>{}</h3>", inner()),
        BlockKind::Heading4 => format!("<h4>{}</h4>", inner()),
        BlockKind::Heading5 => format!("<h5>{}</h5>", inner()),
        BlockKind::Heading6 => format!("<h6>{}</h6>", inner()),
        BlockKind::Preformatted => format!("<pre>{}</pre>", inner()),
        BlockKind::ListItem | BlockKind::OrderedListItem => format!("<li>{}</li>", inner()),
        BlockKind::Image => match block.url.as_deref().filter(|u| is_safe_href(u)) {
            Some(url) => format!(
                r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                escape_attr(url),
                escape_attr(block.alt.as_deref().unwrap_or(""))
            ),
            None => String::new(),
        },
        BlockKind::Embed => match block.oembed.as_ref().filter(|o| is_safe_href(&o.embed_url)) {
            Some(oembed) => {
                let url = escape_attr(&oembed.embed_url);
                let text = html_escape(oembed.title.as_deref().unwrap_or(&oembed.embed_url));
                format!(
                    r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}"><a href="{}" target="_blank" rel="noopener">{}</a></div>"#,
                    url,
                    escape_attr(oembed.kind.as_deref().unwrap_or("")),
                    escape_attr(oembed.provider_name.as_deref().unwrap_or("")),
                    url,
                    text
                )
            }
            None => String::new(),
        },
        BlockKind::Unknown => {
            tracing::debug!("Skipping rich text block of unknown type");
            String::new()
        }
    }
}

/// Apply spans to text, producing properly nested markup.
///
/// Offsets are character indices. A span that crosses the end of an
/// enclosing span is split at that boundary.
fn serialize_spans(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let spans: Vec<Span> = spans
        .iter()
        .map(|s| Span {
            start: s.start.min(chars.len()),
            end: s.end.min(chars.len()),
            ..s.clone()
        })
        .filter(|s| s.start < s.end)
        .collect();
    serialize_range(&chars, 0, chars.len(), spans)
}

fn serialize_range(chars: &[char], from: usize, to: usize, mut spans: Vec<Span>) -> String {
    let mut out = String::new();
    let mut cursor = from;

    loop {
        spans.retain(|s| s.end > cursor);
        for s in spans.iter_mut() {
            s.start = s.start.max(cursor);
        }
        spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        if spans.is_empty() {
            break;
        }

        let span = spans.remove(0);
        out.push_str(&escape_text(&chars[cursor..span.start]));

        let mut children = Vec::new();
        let mut rest = Vec::new();
        for s in spans {
            if s.start >= span.end {
                rest.push(s);
            } else if s.end <= span.end {
                children.push(s);
            } else {
                children.push(Span {
                    end: span.end,
                    ..s.clone()
                });
                rest.push(Span {
                    start: span.end,
                    ..s
                });
            }
        }

        let inner = serialize_range(chars, span.start, span.end, children);
        out.push_str(&wrap_span(&span, &inner));
        cursor = span.end;
        spans = rest;
    }

    out.push_str(&escape_text(&chars[cursor..to]));
    out
}

fn wrap_span(span: &Span, inner: &str) -> String {
    match span.kind {
        SpanKind::Strong => format!("<strong>{}</strong>", inner),
        SpanKind::Em => format!("<em>{}</em>", inner),
        SpanKind::Label => {
            let class = span
                .data
                .as_ref()
                .and_then(|d| d.label.as_deref())
                .unwrap_or("label");
            format!(r#"<span class="{}">{}</span>"#, escape_attr(class), inner)
        }
        SpanKind::Hyperlink => {
            let data = span.data.as_ref();
            match data.and_then(|d| d.url.as_deref()).filter(|u| is_safe_href(u)) {
                Some(url) => {
                    let target = if data.and_then(|d| d.target.as_deref()) == Some("_blank") {
                        r#" target="_blank" rel="noopener""#
                    } else {
                        ""
                    };
                    format!(r#"<a href="{}"{}>{}</a>"#, escape_attr(url), target, inner)
                }
                None => inner.to_string(),
            }
        }
        SpanKind::Unknown => inner.to_string(),
    }
}

fn escape_text(chars: &[char]) -> String {
    let s: String = chars.iter().collect();
    html_escape(&s).replace('\n', "<br />")
}
