//! List posts and whether a build would publish them

use anyhow::Result;
use serde::Serialize;

use crate::content::loader::ContentLoader;
use crate::publish::BuildMode;
use crate::Site;

/// One row of `folio list`
#[derive(Debug, Clone, Serialize)]
pub struct PostListing {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub draft: bool,
    pub reading_time: String,
    pub published: bool,
}

/// Collect the listing rows in listing order
pub fn collect(site: &Site, mode: BuildMode) -> Result<Vec<PostListing>> {
    let predicate = site.config.draft_policy.predicate();
    let posts = ContentLoader::new(site).load_annotated()?;

    Ok(posts
        .into_iter()
        .map(|post| PostListing {
            published: predicate(&post.data, mode),
            reading_time: post.reading_time().to_string(),
            slug: post.slug,
            title: post.data.title,
            date: post.data.date,
            draft: post.data.draft,
        })
        .collect())
}

/// Print the posts, as text or JSON
pub fn run(site: &Site, mode: BuildMode, json: bool) -> Result<()> {
    let rows = collect(site, mode)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let published = rows.iter().filter(|r| r.published).count();
    println!("Posts ({}, {} published in {}):", rows.len(), published, mode);
    for row in rows {
        println!(
            "  {} {} - {} [{}]{}",
            if row.published { "+" } else { "-" },
            row.date,
            row.title,
            row.reading_time,
            if row.draft { " (draft)" } else { "" }
        );
    }

    Ok(())
}
