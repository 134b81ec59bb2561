//! Routes and the navigation capability handed to page views

use crate::config::SiteConfig;
use crate::content::PostKey;
use crate::helpers::{encode_segment, url_for};

/// A navigable location of the site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Listing at the site root, with `pages` pages loaded
    Listing { pages: usize },
    /// Detail page of a single post
    Post(PostKey),
}

impl Route {
    pub fn home() -> Self {
        Route::Listing { pages: 1 }
    }

    /// Path relative to the site root
    pub fn path(&self) -> String {
        match self {
            Route::Listing { pages } if *pages <= 1 => "/".to_string(),
            Route::Listing { pages } => format!("/?pages={}", pages),
            Route::Post(key) => format!("/post/{}", encode_segment(key.as_str())),
        }
    }
}

/// Turns routes into targets that page views can link to
pub trait Navigator: Send + Sync {
    fn go_to(&self, route: &Route) -> String;
}

/// Navigator producing hrefs under the configured site root
#[derive(Debug, Clone)]
pub struct LinkNavigator {
    config: SiteConfig,
}

impl LinkNavigator {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl Navigator for LinkNavigator {
    fn go_to(&self, route: &Route) -> String {
        url_for(&self.config, &route.path())
    }
}
