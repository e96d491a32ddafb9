//! Build the site: load, annotate, filter, render

use anyhow::Result;
use std::time::Instant;

use crate::content::loader::ContentLoader;
use crate::generator::{BuildReport, Generator};
use crate::publish::{filter_posts, BuildMode};
use crate::Site;

/// Run a full build for the given mode
pub fn run(site: &Site, mode: BuildMode) -> Result<BuildReport> {
    let start = Instant::now();

    let posts = ContentLoader::new(site).load_annotated()?;
    tracing::info!("Loaded {} posts", posts.len());

    let predicate = site.config.draft_policy.predicate();
    let visible = filter_posts(&posts, mode, predicate);
    tracing::info!(
        "Publishing {} of {} posts ({} build, {:?} draft policy)",
        visible.len(),
        posts.len(),
        mode,
        site.config.draft_policy
    );

    let generator = Generator::new(site)?;
    let report = generator.generate(&visible)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(report)
}
