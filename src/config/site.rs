//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::publish::DraftPolicy;

/// Errors raised while loading or validating `_config.yml`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("words_per_minute must be greater than zero")]
    ZeroReadingSpeed,

    #[error("blog_prefix must be relative, got {0:?}")]
    AbsoluteBlogPrefix(String),

    #[error("blog_prefix must be empty or end with '/', got {0:?}")]
    UnterminatedBlogPrefix(String),
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    /// Base URL of the deployed site, used as the feed's channel link
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Writing
    /// Path prefix shared by post pages and feed item links
    pub blog_prefix: String,
    pub words_per_minute: usize,
    pub draft_policy: DraftPolicy,

    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            url: "http://localhost:4321".to_string(),

            content_dir: "src/content/blog".to_string(),
            public_dir: "dist".to_string(),

            blog_prefix: "blog/".to_string(),
            words_per_minute: 200,
            draft_policy: DraftPolicy::AsWritten,

            feed: FeedConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.words_per_minute == 0 {
            return Err(ConfigError::ZeroReadingSpeed);
        }
        if self.blog_prefix.starts_with('/') {
            return Err(ConfigError::AbsoluteBlogPrefix(self.blog_prefix.clone()));
        }
        if !self.blog_prefix.is_empty() && !self.blog_prefix.ends_with('/') {
            return Err(ConfigError::UnterminatedBlogPrefix(self.blog_prefix.clone()));
        }
        Ok(())
    }
}

/// RSS feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Output path relative to the public directory
    pub path: String,
    /// Optional XSL stylesheet referenced from the feed
    pub stylesheet: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: "rss.xml".to_string(),
            stylesheet: None,
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SiteConfig = serde_yaml::from_str(
            r#"
title: Notes
url: https://example.com
draft_policy: hide_drafts
feed:
  stylesheet: /rss/styles.xsl
"#,
        )
        .unwrap();

        assert_eq!(config.title, "Notes");
        assert_eq!(config.draft_policy, DraftPolicy::HideDrafts);
        assert_eq!(config.words_per_minute, 200);
        assert_eq!(config.blog_prefix, "blog/");
        assert_eq!(config.feed.path, "rss.xml");
        assert_eq!(config.feed.stylesheet.as_deref(), Some("/rss/styles.xsl"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_speed() {
        let config = SiteConfig {
            words_per_minute: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroReadingSpeed)
        ));
    }

    #[test]
    fn test_validate_rejects_absolute_prefix() {
        let config = SiteConfig {
            blog_prefix: "/blog/".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AbsoluteBlogPrefix(_))
        ));
    }

    #[test]
    fn test_validate_requires_trailing_slash() {
        let config = SiteConfig {
            blog_prefix: "blog".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnterminatedBlogPrefix(_))
        ));

        for prefix in ["", "blog/", "writing/posts/"] {
            let config = SiteConfig {
                blog_prefix: prefix.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "{:?}", prefix);
        }
    }
}
