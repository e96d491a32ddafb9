//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Scaffold a post file in the content directory and return its path
pub fn create_post(site: &Site, title: &str, draft: bool) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    fs::create_dir_all(&site.content_dir)?;
    let file_path = site.content_dir.join(format!("{}.md", slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let date = chrono::Local::now().format("%Y-%m-%d");
    let content = format!(
        "---\ntitle: {}\nbyline: \"\"\ndate: {}\ndraft: {}\n---\n\n",
        yaml_string(title),
        date,
        draft
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote a value for a single-line YAML scalar
fn yaml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
