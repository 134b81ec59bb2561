//! Listing and detail page views

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::{TemplateRenderer, ViewContext};
use crate::config::SiteConfig;
use crate::content::{estimate_reading_time, render, PostDetail, PostSummary};
use crate::helpers::{date_xml, format_post_date, url_for};
use crate::navigation::{Navigator, Route};
use crate::pagination::PaginationState;
use crate::source::SourceError;

/// Lifecycle of a detail page lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailState {
    /// Lookup not resolved yet
    #[default]
    Pending,
    Ready(PostDetail),
    Failed(SourceError),
}

impl DetailState {
    fn name(&self) -> &'static str {
        match self {
            DetailState::Pending => "pending",
            DetailState::Ready(_) => "ready",
            DetailState::Failed(_) => "failed",
        }
    }
}

/// One entry of the listing
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub href: String,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub datetime: String,
    pub author: String,
}

/// Header data of a ready detail page
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub banner_url: String,
    pub date: String,
    pub datetime: String,
    pub author: String,
    pub reading_time: usize,
}

impl TemplateRenderer {
    /// Render the post listing.
    ///
    /// Entries keep the order of `state.items`. The "load more" link is
    /// present when the state still has a cursor and fewer than
    /// `config.max_pages` pages are held.
    pub fn render_listing(
        &self,
        config: &SiteConfig,
        nav: &dyn Navigator,
        state: &PaginationState,
        pages_loaded: usize,
    ) -> Result<String> {
        let tz = config.tz();
        let entries: Vec<EntryView> = state
            .items
            .iter()
            .map(|post: &PostSummary| EntryView {
                href: nav.go_to(&Route::Post(post.key.clone())),
                title: post.title.clone(),
                subtitle: post.subtitle.clone(),
                date: format_post_date(post.published.as_ref(), &tz, &config.date_format),
                datetime: local_datetime(post.published.as_ref(), &tz),
                author: post.author.clone(),
            })
            .collect();

        let load_more_href = if state.has_more() && pages_loaded < config.max_pages {
            let route = Route::Listing {
                pages: pages_loaded + 1,
            };
            Some(format!("{}#post-{}", nav.go_to(&route), entries.len() + 1))
        } else {
            None
        };

        let mut context = self.base_context(config, nav);
        context.insert_text("posts", &entries);
        context.insert_text("load_more_href", &load_more_href);
        context.insert_text("load_more_label", &config.load_more_label);

        let html = self.render("index.html", &context)?;
        tracing::debug!(entries = entries.len(), "Rendered listing");
        Ok(html)
    }

    /// Render a post page, or the placeholder while it is not ready
    pub fn render_detail(
        &self,
        config: &SiteConfig,
        nav: &dyn Navigator,
        state: &DetailState,
    ) -> Result<String> {
        let mut context = self.base_context(config, nav);
        context.insert_text("state", state.name());
        context.insert_text("loading_label", &config.loading_label);

        if let DetailState::Ready(post) = state {
            let tz = config.tz();
            let view = PostView {
                title: post.title.clone(),
                banner_url: post.banner_url.clone(),
                date: format_post_date(post.published.as_ref(), &tz, &config.date_format),
                datetime: local_datetime(post.published.as_ref(), &tz),
                author: post.author.clone(),
                reading_time: estimate_reading_time(&post.content),
            };
            context.insert_text("post", &view);
            context.insert_text("info", &view);
            context.insert_markup("body", &render(&post.content));
        }

        self.render("post.html", &context)
    }

    fn base_context(&self, config: &SiteConfig, nav: &dyn Navigator) -> ViewContext {
        let mut context = ViewContext::new();
        context.insert_text("site_title", &config.title);
        context.insert_text("language", &config.language);
        context.insert_text("home_href", &nav.go_to(&Route::home()));
        context.insert_text("logo_src", &url_for(config, &config.logo));
        context.insert_text("stylesheet", &url_for(config, "/style.css"));
        context
    }
}

/// `datetime` attribute in the same timezone as the visible date
fn local_datetime(published: Option<&DateTime<Utc>>, tz: &Tz) -> String {
    published
        .map(|date| date_xml(&date.with_timezone(tz)))
        .unwrap_or_default()
}
