//! Initialize a new blog directory

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Blog configuration

# Site
title: Blog
language: en
timezone: UTC

# URL
root: /
logo: /logo.svg
static_dir: static

# Listing
page_size: 1
max_pages: 50
load_more_label: Load more posts
loading_label: Loading...

# Date format (Moment.js style)
date_format: DD MMM YYYY

# Content source
# The endpoint and token can also be set with BLOG_SOURCE_ENDPOINT / BLOG_SOURCE_TOKEN
source:
  endpoint: https://your-repository.cdn.prismic.io/api/v2
  access_token:
  document_type: posts
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("static"))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        tracing::warn!("{:?} already exists, leaving it untouched", config_path);
    } else {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
        tracing::debug!("Created: {:?}", config_path);
    }

    let assets = [
        ("logo.svg", include_str!("../../static/logo.svg")),
        ("style.css", include_str!("../../static/style.css")),
    ];
    for (name, content) in assets {
        let path = target_dir.join("static").join(name);
        if !path.exists() {
            fs::write(&path, content)?;
            tracing::debug!("Created: {:?}", path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_init_creates_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let config = SiteConfig::load(dir.path().join("_config.yml")).unwrap();
        assert_eq!(config.page_size, 1);
        assert!(config.source.access_token.is_none());
        assert!(dir.path().join("static/logo.svg").exists());
        assert!(dir.path().join("static/style.css").exists());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_config.yml"), "title: Mine\n").unwrap();
        init_site(dir.path()).unwrap();
        let config = SiteConfig::load(dir.path().join("_config.yml")).unwrap();
        assert_eq!(config.title, "Mine");
    }
}
