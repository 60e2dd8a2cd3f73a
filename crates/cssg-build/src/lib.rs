//! Site build pipeline for cssg.
//!
//! A build is a sequential pass over the project tree:
//!
//! 1. prepare the output directory (emptied first in production)
//! 2. bundle assets (stylesheets through lightningcss, everything else copied)
//! 3. copy the public directory over the output
//! 4. load JSON data files
//! 5. render every page through its layout
//!
//! The whole site is rebuilt every time; there is no per-page invalidation.

mod assets;
mod data;
pub mod error;
mod page;
mod public;
mod render;

pub use error::{BuildError, PageFailure, Result};
pub use page::{split_front_matter, Page};

use cssg_config::ResolvedConfig;
use std::path::Path;
use std::time::{Duration, Instant};

/// Which flavour of output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Fast, unminified, output directory kept between builds.
    Development,
    /// Clean output directory, minified stylesheets.
    Production,
}

impl BuildMode {
    pub fn is_production(self) -> bool {
        matches!(self, BuildMode::Production)
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
        })
    }
}

/// Summary of a successful build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub pages: usize,
    pub assets: usize,
    pub public_files: usize,
    pub data_keys: Vec<String>,
    pub duration: Duration,
}

/// Run a full site build.
///
/// # Errors
///
/// Asset, data and I/O failures abort the build. Page failures do not: every
/// renderable page is still written, then [`BuildError::Pages`] lists the
/// pages that failed.
pub fn build(config: &ResolvedConfig, mode: BuildMode) -> Result<BuildReport> {
    let start = Instant::now();
    tracing::info!(%mode, out_dir = %config.out_dir.display(), "starting build");

    if mode.is_production() {
        empty_dir(&config.out_dir)?;
    }
    std::fs::create_dir_all(&config.out_dir).map_err(error::io_at(&config.out_dir))?;

    let assets = assets::bundle_assets(config, mode)?;
    tracing::debug!(assets, "assets processed");

    let public_files = public::copy_public(&config.public_dir, &config.out_dir)?;
    if public_files == 0 {
        tracing::debug!("no public files copied");
    }

    let data = data::load_data(&config.data_dir)?;
    let data_keys: Vec<String> = data.keys().cloned().collect();
    if !data_keys.is_empty() {
        tracing::debug!(keys = ?data_keys, "data loaded");
    }

    let outcome = render::render_pages(config, &data)?;
    let duration = start.elapsed();

    if !outcome.failures.is_empty() {
        return Err(BuildError::Pages {
            failures: outcome.failures,
        });
    }

    tracing::info!(
        pages = outcome.rendered,
        ?duration,
        %mode,
        "build finished"
    );

    Ok(BuildReport {
        pages: outcome.rendered,
        assets,
        public_files,
        data_keys,
        duration,
    })
}

/// Remove everything inside `dir`, keeping the directory itself.
fn empty_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir).map_err(error::io_at(dir))? {
        let path = entry.map_err(error::io_at(dir))?.path();
        if path.is_dir() {
            std::fs::remove_dir_all(&path).map_err(error::io_at(&path))?;
        } else {
            std::fs::remove_file(&path).map_err(error::io_at(&path))?;
        }
    }
    Ok(())
}
