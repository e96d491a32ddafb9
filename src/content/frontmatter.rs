//! Front-matter parsing

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Why a document's front matter could not be turned into [`PostMetadata`]
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("document does not start with a `---` front-matter block")]
    Missing,

    #[error("front-matter block is not closed by `---`")]
    Unterminated,

    #[error("invalid front matter: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

/// Accepts a scalar (string, number or bool) and keeps its textual form
///
/// Dates are free-form strings, but YAML happily reads `date: 2023` as a number.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ScalarAsString;

    impl<'de> Visitor<'de> for ScalarAsString {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(ScalarAsString)
}

/// Authored metadata of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    /// Not-yet-finalized marker; how it affects visibility is up to the publish policy
    #[serde(default)]
    pub draft: bool,
    #[serde(deserialize_with = "scalar_as_string")]
    pub title: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub byline: String,
    /// Free-form date string, only interpreted when a feed needs a `pubDate`
    #[serde(deserialize_with = "scalar_as_string")]
    pub date: String,
}

impl PostMetadata {
    /// Parse the YAML front matter at the head of `content`
    /// Returns (metadata, body)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let (yaml, body) = split_front_matter(content)?;
        let data = serde_yaml::from_str::<PostMetadata>(yaml)?;
        Ok((data, body))
    }
}

/// Split a document into its raw YAML block and the body that follows
pub fn split_front_matter(content: &str) -> Result<(&str, &str), FrontMatterError> {
    let content = content.trim_start_matches('\u{feff}').trim_start();
    let rest = content
        .strip_prefix("---")
        .ok_or(FrontMatterError::Missing)?;
    let rest = rest.trim_start_matches([' ', '\t']);
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .ok_or(FrontMatterError::Missing)?;

    // Empty block: closing fence right away
    if let Some(body) = rest.strip_prefix("---") {
        return Ok(("", body.trim_start_matches(['\n', '\r'])));
    }

    let end_pos = rest.find("\n---").ok_or(FrontMatterError::Unterminated)?;
    let yaml = &rest[..end_pos];
    let body = &rest[end_pos + 4..]; // Skip \n---
    let body = body.trim_start_matches(['-', ' ', '\t']);
    let body = body.trim_start_matches(['\n', '\r']);

    Ok((yaml, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_metadata() {
        let content = r#"---
title: Hello World
byline: A first post
date: 2023-07-08
draft: true
---

This is the content.
"#;

        let (data, body) = PostMetadata::parse(content).unwrap();
        assert_eq!(data.title, "Hello World");
        assert_eq!(data.byline, "A first post");
        assert_eq!(data.date, "2023-07-08");
        assert!(data.draft);
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_draft_defaults_to_false() {
        let content = "---\ntitle: T\nbyline: B\ndate: Jul 08 2022\n---\nBody";
        let (data, body) = PostMetadata::parse(content).unwrap();
        assert!(!data.draft);
        assert_eq!(data.date, "Jul 08 2022");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_numeric_scalars_kept_as_text() {
        let content = "---\ntitle: 1984\nbyline: B\ndate: 2022\n---\n";
        let (data, _) = PostMetadata::parse(content).unwrap();
        assert_eq!(data.title, "1984");
        assert_eq!(data.date, "2022");
    }

    #[test]
    fn test_crlf_front_matter() {
        let content = "---\r\ntitle: T\r\nbyline: B\r\ndate: 2024-01-15\r\n---\r\nBody\r\n";
        let (data, body) = PostMetadata::parse(content).unwrap();
        assert_eq!(data.date, "2024-01-15");
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_missing_required_field() {
        let content = "---\ntitle: Only a title\ndate: 2024-01-15\n---\nBody";
        let err = PostMetadata::parse(content).unwrap_err();
        assert!(matches!(err, FrontMatterError::Invalid(_)));
        assert!(err.to_string().contains("byline"));
    }

    #[test]
    fn test_no_front_matter() {
        let err = PostMetadata::parse("# Just markdown\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Missing));
    }

    #[test]
    fn test_unterminated_front_matter() {
        let err = PostMetadata::parse("---\ntitle: T\n\nBody").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_empty_block_is_invalid() {
        let err = PostMetadata::parse("---\n---\nBody").unwrap_err();
        assert!(matches!(err, FrontMatterError::Invalid(_)));
    }
}
