//! Generator module - renders the published posts into pages and a feed

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};

use tera::Context;

use crate::content::{AnnotatedPost, MarkdownRenderer};
use crate::feed::RssFeed;
use crate::helpers::{date_xml, parse_date, post_link, url_for};
use crate::templates::{PostData, SiteData, TemplateRenderer};
use crate::Site;

/// A generated file, path relative to the public directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub path: PathBuf,
    pub contents: String,
}

/// What a generation pass produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub post_pages: usize,
    pub feed_items: usize,
}

/// Static site generator using Tera templates
pub struct Generator<'a> {
    site: &'a Site,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(site: &'a Site) -> Result<Self> {
        Ok(Self {
            site,
            renderer: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::with_config(&site.config.highlight),
        })
    }

    /// Render and write every artifact for the given posts
    ///
    /// Everything is rendered before anything is written, so a failing post
    /// leaves the previous output untouched. On success the public directory
    /// is replaced wholesale: pages of posts no longer published disappear.
    pub fn generate(&self, posts: &[&AnnotatedPost]) -> Result<BuildReport> {
        let mut pages = self.render_pages(posts)?;
        let post_pages = pages.len();
        pages.push(self.render_listing(posts)?);
        pages.push(self.render_feed(posts)?);

        if self.site.public_dir.exists() {
            fs::remove_dir_all(&self.site.public_dir)
                .with_context(|| format!("Failed to clear {:?}", self.site.public_dir))?;
            tracing::debug!("Cleared {:?}", self.site.public_dir);
        }
        fs::create_dir_all(&self.site.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.site.public_dir))?;
        for page in &pages {
            write_page(&self.site.public_dir, page)?;
        }

        tracing::info!("Generated {} post pages", post_pages);
        tracing::info!("Generated {} with {} items", self.site.config.feed.path, posts.len());

        Ok(BuildReport {
            post_pages,
            feed_items: posts.len(),
        })
    }

    /// One detail page per post, keyed by slug
    pub fn render_pages(&self, posts: &[&AnnotatedPost]) -> Result<Vec<RenderedPage>> {
        let site_data = self.site_data();

        posts
            .iter()
            .map(|post| -> Result<RenderedPage> {
                let mut context = Context::new();
                context.insert("site", &site_data);
                context.insert("post", &self.post_data(post, true));

                let html = self
                    .renderer
                    .render("post.html", &context)
                    .with_context(|| format!("Failed to render post {:?}", post.slug))?;

                Ok(RenderedPage {
                    path: Path::new(&self.page_dir(post)).join("index.html"),
                    contents: html,
                })
            })
            .collect()
    }

    /// Listing of the posts in the order given
    pub fn render_listing(&self, posts: &[&AnnotatedPost]) -> Result<RenderedPage> {
        let post_data: Vec<PostData> = posts.iter().map(|p| self.post_data(p, false)).collect();

        let mut context = Context::new();
        context.insert("site", &self.site_data());
        context.insert("posts", &post_data);

        let html = self
            .renderer
            .render("list.html", &context)
            .context("Failed to render post listing")?;

        Ok(RenderedPage {
            path: Path::new(&self.site.config.blog_prefix).join("index.html"),
            contents: html,
        })
    }

    /// RSS document for the posts in the order given
    pub fn render_feed(&self, posts: &[&AnnotatedPost]) -> Result<RenderedPage> {
        let xml = RssFeed::from_config(&self.site.config).render(posts)?;
        Ok(RenderedPage {
            path: PathBuf::from(&self.site.config.feed.path),
            contents: xml,
        })
    }

    fn page_dir(&self, post: &AnnotatedPost) -> String {
        post_link(&self.site.config.blog_prefix, &post.slug)
    }

    fn site_data(&self) -> SiteData {
        let config = &self.site.config;
        SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            blog_url: url_for(&config.blog_prefix),
            feed_url: url_for(&config.feed.path),
        }
    }

    fn post_data(&self, post: &AnnotatedPost, with_content: bool) -> PostData {
        PostData {
            slug: post.slug.clone(),
            title: post.data.title.clone(),
            byline: post.data.byline.clone(),
            date: post.data.date.clone(),
            date_iso: parse_date(&post.data.date).map(|d| date_xml(&d)),
            reading_time: post.reading_time().to_string(),
            url: url_for(&format!("{}/", self.page_dir(post))),
            content: if with_content {
                self.markdown.render(&post.body)
            } else {
                String::new()
            },
        }
    }
}

fn write_page(public_dir: &Path, page: &RenderedPage) -> Result<()> {
    let output_path = public_dir.join(&page.path);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    fs::write(&output_path, &page.contents)
        .with_context(|| format!("Failed to write {:?}", output_path))?;
    tracing::debug!("Wrote {:?}", output_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{Post, PostMetadata, ReadingTimeEstimator};

    fn site() -> Site {
        Site::with_config("/tmp/folio-generator-test", SiteConfig::default())
    }

    fn post(slug: &str, title: &str, date: &str) -> AnnotatedPost {
        let data = PostMetadata {
            draft: false,
            title: title.to_string(),
            byline: format!("about {}", slug),
            date: date.to_string(),
        };
        Post::new(slug, data, "Hello *there*.").annotate(&ReadingTimeEstimator::default())
    }

    #[test]
    fn test_render_pages_keyed_by_slug() {
        let site = site();
        let generator = Generator::new(&site).unwrap();
        let posts = [post("a", "First", "2024-01-01"), post("2023/b", "Second", "whenever")];
        let refs: Vec<_> = posts.iter().collect();

        let pages = generator.render_pages(&refs).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].path, PathBuf::from("blog/a/index.html"));
        assert_eq!(pages[1].path, PathBuf::from("blog/2023/b/index.html"));

        let first = &pages[0].contents;
        assert!(first.contains("<h1>First</h1>"));
        assert!(first.contains("about a"));
        assert!(first.contains("1 min read"));
        assert!(first.contains("<em>there</em>"));

        // Display never depends on the date parsing
        assert!(pages[1].contents.contains("<span>whenever</span>"));
    }

    #[test]
    fn test_listing_follows_input_order() {
        let site = site();
        let generator = Generator::new(&site).unwrap();
        let posts = [post("z", "Zed", "2024-01-01"), post("a", "Ay", "2024-01-02")];
        let refs: Vec<_> = posts.iter().collect();

        let listing = generator.render_listing(&refs).unwrap();
        assert_eq!(listing.path, PathBuf::from("blog/index.html"));
        let zed = listing.contents.find(r#"href="/blog/z/""#).unwrap();
        let ay = listing.contents.find(r#"href="/blog/a/""#).unwrap();
        assert!(zed < ay);
    }

    #[test]
    fn test_empty_input_renders_nothing_per_post() {
        let site = site();
        let generator = Generator::new(&site).unwrap();

        assert!(generator.render_pages(&[]).unwrap().is_empty());
        let feed = generator.render_feed(&[]).unwrap();
        assert_eq!(feed.path, PathBuf::from("rss.xml"));
        assert!(!feed.contents.contains("<item>"));
    }

    #[test]
    fn test_feed_rejects_bad_date() {
        let site = site();
        let generator = Generator::new(&site).unwrap();
        let posts = [post("a", "First", "whenever")];
        let refs: Vec<_> = posts.iter().collect();

        let err = generator.render_feed(&refs).unwrap_err();
        assert!(err.to_string().contains("unparseable date"));
    }
}
