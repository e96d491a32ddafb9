//! Content loader - loads posts from the content directory

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{AnnotatedPost, ContentError, Post, PostMetadata, ReadingTimeEstimator};
use crate::Site;

/// Loads posts from the content directory
pub struct ContentLoader<'a> {
    content_dir: &'a Path,
    estimator: ReadingTimeEstimator,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self {
            content_dir: &site.content_dir,
            estimator: ReadingTimeEstimator::new(site.config.words_per_minute),
        }
    }

    /// Load every post, in listing order (sorted by relative path)
    pub fn load_posts(&self) -> Result<Vec<Post>, ContentError> {
        if !self.content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", self.content_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for entry in WalkDir::new(self.content_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| ContentError::Walk {
                path: self.content_dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let post = self.load_post(path)?;
            if let Some(first) = seen.insert(post.slug.clone(), path.to_path_buf()) {
                return Err(ContentError::DuplicateSlug {
                    slug: post.slug,
                    first,
                    second: path.to_path_buf(),
                });
            }

            tracing::debug!("Loaded post {:?} from {:?}", post.slug, path);
            posts.push(post);
        }

        Ok(posts)
    }

    /// Load every post and run the reading-time enrichment on each
    pub fn load_annotated(&self) -> Result<Vec<AnnotatedPost>, ContentError> {
        let posts = self.load_posts()?;
        Ok(posts
            .into_iter()
            .map(|post| post.annotate(&self.estimator))
            .collect())
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (data, body) =
            PostMetadata::parse(&content).map_err(|source| ContentError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Post::new(slug_for(self.content_dir, path), data, body))
    }
}

/// Slug of a post: its path under the content dir, without extension, lower-cased
pub fn slug_for(content_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(content_dir).unwrap_or(path);
    let relative = relative.with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_lowercase())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("markdown")
    )
}
