//! headless-blog: a server-rendered blog front-end for a headless CMS
//!
//! Posts are read from a paginated content API, listed with incremental
//! "load more" pagination, and rendered to HTML with a reading time
//! estimate computed from their rich text body.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod navigation;
pub mod pagination;
pub mod server;
pub mod source;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::PostKey;
use navigation::LinkNavigator;
use pagination::PaginationController;
use source::{ContentSource, PrismicSource, SourceError};
use templates::{DetailState, TemplateRenderer};

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory of static assets served as-is
    pub static_dir: PathBuf,
    source: Arc<dyn ContentSource>,
    renderer: Arc<TemplateRenderer>,
}

impl Blog {
    /// Create a blog from a directory, talking to the configured content API
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config = Self::load_config(base_dir.as_ref())?;
        let source = PrismicSource::new(&config.source)?;
        Self::with_source(config, base_dir, Arc::new(source))
    }

    /// Create a blog around an already constructed content source
    pub fn with_source<P: AsRef<Path>>(
        config: config::SiteConfig,
        base_dir: P,
        source: Arc<dyn ContentSource>,
    ) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let static_dir = base_dir.join(&config.static_dir);
        tracing::debug!("Using {} content source", source.name());

        Ok(Self {
            config,
            base_dir,
            static_dir,
            source,
            renderer: Arc::new(TemplateRenderer::new()?),
        })
    }

    /// Read `_config.yml` from `base_dir` (defaults when absent) and apply
    /// environment overrides
    pub fn load_config(base_dir: &Path) -> Result<config::SiteConfig> {
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn source(&self) -> &dyn ContentSource {
        self.source.as_ref()
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    pub fn navigator(&self) -> LinkNavigator {
        LinkNavigator::new(&self.config)
    }

    /// Fetch the first page and load more until `pages` pages are held.
    ///
    /// Only a failure of the first page is an error; a failed follow-up
    /// page leaves the listing as it was before that page.
    pub async fn listing(&self, pages: usize) -> Result<PaginationController<'_>, SourceError> {
        let pages = pages.clamp(1, self.config.max_pages.max(1));
        let first_page = self.source.query_first_page(self.config.page_size).await?;
        let mut controller = PaginationController::new(self.source(), first_page);
        controller.load_pages(pages).await;
        Ok(controller)
    }

    /// Look up a post for its detail page
    pub async fn detail(&self, key: &PostKey) -> DetailState {
        match self.source.query_by_key(key).await {
            Ok(post) => DetailState::Ready(post),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Post lookup failed");
                DetailState::Failed(e)
            }
        }
    }
}
