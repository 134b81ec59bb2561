//! Built-in page templates using the Tera template engine
//!
//! All templates are embedded directly in the binary. Every value is
//! HTML-escaped on output except entries of the `markup` map, which can
//! only be filled with a [`RenderedDocument`].

mod views;

pub use views::{DetailState, EntryView, PostView};

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tera::{Context, Tera};

use crate::content::RenderedDocument;
use crate::helpers::html_escape;

/// Template renderer with embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescape stays on for *.html; use our escaper so URLs keep their slashes
        tera.set_escape_fn(html_escape);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
            (
                "partials/post_info.html",
                include_str!("blog/partials/post_info.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &ViewContext) -> Result<String> {
        let mut context = context.clone();
        context.finish();
        Ok(self.tera.render(template_name, &context.inner)?)
    }
}

/// Template context that keeps plain text and trusted markup apart
#[derive(Debug, Clone)]
pub struct ViewContext {
    inner: Context,
    markup: BTreeMap<String, String>,
}

impl ViewContext {
    pub fn new() -> Self {
        Self {
            inner: Context::new(),
            markup: BTreeMap::new(),
        }
    }

    /// Insert a value rendered as escaped text
    pub fn insert_text<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.inner.insert(key, value);
    }

    /// Insert trusted markup, available to templates as `markup.<key>`
    pub fn insert_markup(&mut self, key: &str, document: &RenderedDocument) {
        self.markup
            .insert(key.to_string(), document.as_str().to_string());
    }

    fn finish(&mut self) {
        self.inner.insert("markup", &self.markup);
    }
}

impl Default for ViewContext {
    fn default() -> Self {
        Self::new()
    }
}
