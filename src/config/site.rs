//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding `source.endpoint`
pub const ENDPOINT_ENV: &str = "BLOG_SOURCE_ENDPOINT";

/// Environment variable overriding `source.access_token`
pub const TOKEN_ENV: &str = "BLOG_SOURCE_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub root: String,
    pub logo: String,
    pub static_dir: String,

    // Listing
    pub page_size: usize,
    pub max_pages: usize,
    pub load_more_label: String,
    pub loading_label: String,

    // Date / Time format
    pub date_format: String,

    // Content source
    #[serde(default)]
    pub source: SourceConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),

            root: "/".to_string(),
            logo: "/logo.svg".to_string(),
            static_dir: "static".to_string(),

            page_size: 1,
            max_pages: 50,
            load_more_label: "Load more posts".to_string(),
            loading_label: "Loading...".to_string(),

            date_format: "DD MMM YYYY".to_string(),

            source: SourceConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Apply `BLOG_SOURCE_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENDPOINT_ENV).ok(),
            std::env::var(TOKEN_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, endpoint: Option<String>, token: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) {
            tracing::debug!("Content source endpoint overridden from environment");
            self.source.endpoint = endpoint;
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.source.access_token = Some(token);
        }
    }

    /// Resolve the configured timezone, falling back to UTC
    pub fn tz(&self) -> chrono_tz::Tz {
        match self.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
                chrono_tz::UTC
            }
        }
    }
}

/// Headless content API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// API root, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub access_token: Option<String>,
    pub document_type: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_token: None,
            document_type: "posts".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.page_size, 1);
        assert_eq!(config.date_format, "DD MMM YYYY");
        assert_eq!(config.source.document_type, "posts");
        assert!(config.source.access_token.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: spacetraveling
page_size: 5
timezone: America/Sao_Paulo
source:
  endpoint: https://example.cdn.prismic.io/api/v2
  access_token: secret
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "spacetraveling");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.source.endpoint, "https://example.cdn.prismic.io/api/v2");
        assert_eq!(config.source.access_token.as_deref(), Some("secret"));
        assert_eq!(config.source.document_type, "posts");
        assert_eq!(config.tz(), chrono_tz::America::Sao_Paulo);
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_utc() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..SiteConfig::default()
        };
        assert_eq!(config.tz(), chrono_tz::UTC);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SiteConfig::default();
        config.apply_overrides(Some("https://api.example.com".to_string()), Some(String::new()));
        assert_eq!(config.source.endpoint, "https://api.example.com");
        assert!(config.source.access_token.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "title: From File\nloading_label: Carregando...\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "From File");
        assert_eq!(config.loading_label, "Carregando...");
    }
}
