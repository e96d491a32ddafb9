//! Content module - post store, front matter and reading-time enrichment

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod reading_time;

pub use error::ContentError;
pub use frontmatter::{split_front_matter, FrontMatterError, PostMetadata};
pub use markdown::{plain_text, MarkdownRenderer};
pub use post::{AnnotatedPost, InjectedFrontmatter, Post};
pub use reading_time::{ReadingTime, ReadingTimeEstimator};
