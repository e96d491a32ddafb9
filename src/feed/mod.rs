//! RSS feed rendering

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::content::AnnotatedPost;
use crate::helpers::{date_rfc2822, full_url, parse_date, post_link};

/// Failures while producing the feed; any of them fails the build
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("post {slug:?} has an unparseable date {date:?}")]
    InvalidDate { slug: String, date: String },

    #[error("failed to write feed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("feed XML is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// One `<item>` of the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    /// Site-relative link, `blog_prefix` + slug
    pub link: String,
    /// Absolute permalink
    pub guid: String,
    /// RFC 2822 date
    pub pub_date: String,
}

/// RSS 2.0 channel description
pub struct RssFeed<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// Base URL of the site
    pub site: &'a str,
    pub stylesheet: Option<&'a str>,
    pub blog_prefix: &'a str,
}

impl<'a> RssFeed<'a> {
    pub fn from_config(config: &'a SiteConfig) -> Self {
        Self {
            title: &config.title,
            description: &config.description,
            site: &config.url,
            stylesheet: config.feed.stylesheet.as_deref(),
            blog_prefix: &config.blog_prefix,
        }
    }

    /// Build the feed items in the order given, failing on the first bad date
    pub fn items(&self, posts: &[&AnnotatedPost]) -> Result<Vec<FeedItem>, FeedError> {
        posts
            .iter()
            .map(|post| -> Result<FeedItem, FeedError> {
                let date = parse_date(&post.data.date).ok_or_else(|| FeedError::InvalidDate {
                    slug: post.slug.clone(),
                    date: post.data.date.clone(),
                })?;
                let link = post_link(self.blog_prefix, &post.slug);
                Ok(FeedItem {
                    title: post.data.title.clone(),
                    guid: full_url(self.site, &link),
                    link,
                    pub_date: date_rfc2822(&date),
                })
            })
            .collect()
    }

    /// Render the whole RSS document
    pub fn render(&self, posts: &[&AnnotatedPost]) -> Result<String, FeedError> {
        let items = self.items(posts)?;
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        self.write_document(&mut writer, &items)?;
        Ok(String::from_utf8(writer.into_inner().into_inner())?)
    }

    fn write_document(
        &self,
        writer: &mut Writer<Cursor<Vec<u8>>>,
        items: &[FeedItem],
    ) -> quick_xml::Result<()> {
        // <?xml version="1.0" encoding="UTF-8"?>
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        // <?xml-stylesheet href="/rss/styles.xsl" type="text/xsl"?>
        if let Some(href) = self.stylesheet {
            write!(
                writer.get_mut(),
                "\n<?xml-stylesheet href=\"{}\" type=\"text/xsl\"?>",
                escape(&strip_invalid_xml_chars(href))
            )?;
        }

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(writer, "title", self.title)?;
        push_text(writer, "link", self.site)?;
        push_text(writer, "description", self.description)?;

        for item in items {
            writer.write_event(Event::Start(BytesStart::new("item")))?;
            push_text(writer, "title", &item.title)?;
            push_text(writer, "link", &item.link)?;

            let mut guid = BytesStart::new("guid");
            guid.push_attribute(("isPermaLink", "true"));
            writer.write_event(Event::Start(guid))?;
            writer.write_event(Event::Text(BytesText::new(&strip_invalid_xml_chars(
                &item.guid,
            ))))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            push_text(writer, "pubDate", &item.pub_date)?;
            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;
        Ok(())
    }
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    let text = strip_invalid_xml_chars(text);
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(&text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Drop characters XML 1.0 does not allow (keeps tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}
