//! Post models

use serde::Serialize;

use super::frontmatter::PostMetadata;
use super::markdown;
use super::reading_time::{ReadingTime, ReadingTimeEstimator};

/// A blog post as loaded from the content directory
///
/// Immutable once constructed; derived metadata lives on [`AnnotatedPost`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// URL path segment, unique across the content directory
    pub slug: String,
    pub data: PostMetadata,
    /// Markdown body after the front matter
    pub body: String,
}

impl Post {
    pub fn new(slug: impl Into<String>, data: PostMetadata, body: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            data,
            body: body.into(),
        }
    }

    /// Enrichment stage: compute reading time and return the populated record
    pub fn annotate(self, estimator: &ReadingTimeEstimator) -> AnnotatedPost {
        let reading_time = estimator.estimate(&markdown::plain_text(&self.body));
        AnnotatedPost {
            slug: self.slug,
            data: self.data,
            injected_frontmatter: InjectedFrontmatter::new(reading_time),
            body: self.body,
        }
    }
}

/// Metadata computed at load time, never authored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectedFrontmatter {
    /// Human-readable estimate, e.g. "3 min read"
    pub reading_time: String,
    #[serde(skip)]
    pub estimate: ReadingTime,
}

impl InjectedFrontmatter {
    pub fn new(estimate: ReadingTime) -> Self {
        Self {
            reading_time: estimate.to_string(),
            estimate,
        }
    }
}

/// A post together with its injected front matter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedPost {
    pub slug: String,
    pub data: PostMetadata,
    #[serde(rename = "injectedFrontmatter")]
    pub injected_frontmatter: InjectedFrontmatter,
    pub body: String,
}

impl AnnotatedPost {
    pub fn reading_time(&self) -> &str {
        &self.injected_frontmatter.reading_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> PostMetadata {
        PostMetadata {
            draft: false,
            title: "Hello".to_string(),
            byline: "First words".to_string(),
            date: "2023-07-08".to_string(),
        }
    }

    #[test]
    fn test_annotate_keeps_body_and_metadata() {
        let body = "# Heading\n\nSome *emphasised* text.";
        let post = Post::new("hello", metadata(), body);
        let annotated = post.clone().annotate(&ReadingTimeEstimator::default());

        assert_eq!(annotated.slug, post.slug);
        assert_eq!(annotated.data, post.data);
        assert_eq!(annotated.body, body);
        assert_eq!(annotated.reading_time(), "1 min read");
        assert_eq!(annotated.injected_frontmatter.estimate.words, 4);
    }

    #[test]
    fn test_annotate_counts_text_not_markup() {
        let body = "[link](https://example.com/a/very/long/url) **bold**";
        let annotated =
            Post::new("p", metadata(), body).annotate(&ReadingTimeEstimator::default());
        assert_eq!(annotated.injected_frontmatter.estimate.words, 2);
    }

    #[test]
    fn test_long_body_reading_time() {
        let body = vec!["word"; 450].join(" ");
        let annotated =
            Post::new("long", metadata(), body).annotate(&ReadingTimeEstimator::new(200));
        assert_eq!(annotated.reading_time(), "3 min read");
    }

    #[test]
    fn test_serializes_injected_frontmatter() {
        let annotated =
            Post::new("p", metadata(), "text").annotate(&ReadingTimeEstimator::default());
        let json = serde_json::to_value(&annotated).unwrap();
        assert_eq!(
            json["injectedFrontmatter"]["readingTime"],
            serde_json::json!("1 min read")
        );
        assert_eq!(json["data"]["draft"], serde_json::json!(false));
    }
}
