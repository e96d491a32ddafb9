//! folio: the build-time content pipeline of a personal blog
//!
//! Markdown posts are loaded from the content directory, enriched with a
//! reading-time estimate, filtered by draft flag and build mode, and rendered
//! into one HTML page per post, a listing page and an RSS feed.

pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod generator;
pub mod helpers;
pub mod publish;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use generator::BuildReport;
pub use publish::BuildMode;

/// Name of the site configuration file inside the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A blog site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the markdown posts
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a site with an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Re-read the configuration from disk
    pub fn reload_config(&self) -> Result<Self> {
        Self::new(&self.base_dir)
    }

    /// Generate the static site for the given build mode
    pub fn build(&self, mode: BuildMode) -> Result<BuildReport> {
        commands::build::run(self, mode)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, draft: bool) -> Result<PathBuf> {
        commands::new::create_post(self, title, draft)
    }
}
