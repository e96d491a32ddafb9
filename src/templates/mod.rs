//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary; `.html` templates are autoescaped,
//! rendered post bodies go through the `safe` filter.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("post.html", include_str!("site/post.html")),
            ("list.html", include_str!("site/list.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Site-wide values available to every template
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub blog_url: String,
    pub feed_url: String,
}

/// A post as seen by the templates
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub slug: String,
    pub title: String,
    pub byline: String,
    /// Date as authored
    pub date: String,
    /// Machine-readable date, when the authored one parses
    pub date_iso: Option<String>,
    pub reading_time: String,
    pub url: String,
    /// Rendered HTML body; empty on listing pages
    pub content: String,
}
