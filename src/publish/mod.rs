//! Visibility filter - decides which posts are published for a build

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::content::{AnnotatedPost, PostMetadata};

/// Which kind of output the build produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Production,
    Development,
}

impl BuildMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Production => "production",
            BuildMode::Development => "development",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(BuildMode::Production),
            "development" | "dev" => Ok(BuildMode::Development),
            other => Err(format!(
                "unknown build mode {:?}, expected production or development",
                other
            )),
        }
    }
}

/// Signature shared by every publish rule
pub type PublishPredicate = fn(&PostMetadata, BuildMode) -> bool;

/// Publish rule as the site has always behaved: a post is shown when it is
/// flagged `draft`, or when building for development.
///
/// This reads inverted (drafts are what production shows); see [`hide_drafts`].
pub fn should_publish(data: &PostMetadata, mode: BuildMode) -> bool {
    data.draft || mode == BuildMode::Development
}

/// Conventional rule: drafts only appear in development builds
pub fn hide_drafts(data: &PostMetadata, mode: BuildMode) -> bool {
    !data.draft || mode == BuildMode::Development
}

/// Configurable choice between the publish rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftPolicy {
    /// [`should_publish`]
    #[default]
    AsWritten,
    /// [`hide_drafts`]
    HideDrafts,
}

impl DraftPolicy {
    pub fn predicate(&self) -> PublishPredicate {
        match self {
            DraftPolicy::AsWritten => should_publish,
            DraftPolicy::HideDrafts => hide_drafts,
        }
    }
}

/// Keep the posts the predicate accepts, in their original order
pub fn filter_posts(
    posts: &[AnnotatedPost],
    mode: BuildMode,
    predicate: PublishPredicate,
) -> Vec<&AnnotatedPost> {
    posts
        .iter()
        .filter(|post| {
            let publish = predicate(&post.data, mode);
            tracing::debug!(
                "{} post {:?} (draft: {}, mode: {})",
                if publish { "Publishing" } else { "Skipping" },
                post.slug,
                post.data.draft,
                mode
            );
            publish
        })
        .collect()
}
