//! Asset bundling.
//!
//! Every file under the assets directory lands at `out/assets/<relative path>`.
//! Stylesheets are bundled by lightningcss: `@import`ed files are inlined
//! into the importing sheet, and the result is minified in production.
//! Anything else is copied byte for byte. Each file is an independent bundle,
//! so they are processed in parallel.

use cssg_config::ResolvedConfig;
use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, StyleSheet};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{io_at, BuildError, Result};
use crate::BuildMode;

/// Output subdirectory for bundled assets.
pub(crate) const ASSETS_OUT_DIR: &str = "assets";

/// Bundle all assets, returning how many files were written.
pub(crate) fn bundle_assets(config: &ResolvedConfig, mode: BuildMode) -> Result<usize> {
    if !config.assets_dir.is_dir() {
        tracing::debug!(dir = %config.assets_dir.display(), "no assets directory, skipping");
        return Ok(0);
    }

    let out_root = config.out_dir.join(ASSETS_OUT_DIR);
    let entries: Vec<PathBuf> = WalkDir::new(&config.assets_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    entries
        .par_iter()
        .map(|source| {
            let rel = source
                .strip_prefix(&config.assets_dir)
                .unwrap_or(source.as_path());
            let target = out_root.join(rel);
            bundle_one(source, &target, mode)
        })
        .collect::<Result<Vec<()>>>()?;

    Ok(entries.len())
}

fn bundle_one(source: &Path, target: &Path, mode: BuildMode) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(io_at(parent))?;
    }

    if is_stylesheet(source) {
        let output = bundle_css(source, mode.is_production())?;
        std::fs::write(target, output).map_err(io_at(target))?;
    } else {
        std::fs::copy(source, target).map_err(io_at(source))?;
    }
    Ok(())
}

fn is_stylesheet(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("css")
}

/// Bundle the stylesheet at `entry` with everything it `@import`s.
pub(crate) fn bundle_css(entry: &Path, minify: bool) -> Result<String> {
    let css_error = |message: String| BuildError::Css {
        file: entry.to_path_buf(),
        message,
    };

    let provider = FileProvider::new();
    let mut bundler = Bundler::new(&provider, None, ParserOptions::default());
    let mut stylesheet = bundler
        .bundle(entry)
        .map_err(|e| css_error(e.to_string()))?;

    if minify {
        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| css_error(e.to_string()))?;
    }

    let result = stylesheet
        .to_css(PrinterOptions {
            minify,
            ..Default::default()
        })
        .map_err(|e| css_error(e.to_string()))?;

    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sheet(dir: &TempDir, name: &str, css: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, css).unwrap();
        path
    }

    #[test]
    fn minify_strips_whitespace() {
        let dir = TempDir::new().unwrap();
        let entry = sheet(&dir, "style.css", "body {\n  color: red;\n}\n");
        assert_eq!(bundle_css(&entry, true).unwrap(), "body{color:red}");
    }

    #[test]
    fn development_keeps_rules_readable() {
        let dir = TempDir::new().unwrap();
        let entry = sheet(&dir, "style.css", "body { color: red; }");
        assert!(bundle_css(&entry, false).unwrap().contains("color: red"));
    }

    #[test]
    fn imports_are_inlined() {
        let dir = TempDir::new().unwrap();
        sheet(&dir, "css/partials/reset.css", "html { margin: 0; }");
        let entry = sheet(
            &dir,
            "css/style.css",
            "@import \"partials/reset.css\";\nbody { color: red; }",
        );

        let out = bundle_css(&entry, true).unwrap();

        assert_eq!(out, "html{margin:0}body{color:red}");
    }

    #[test]
    fn missing_import_is_a_css_error() {
        let dir = TempDir::new().unwrap();
        let entry = sheet(&dir, "style.css", "@import \"gone.css\";\nbody { color: red; }");

        let err = bundle_css(&entry, false).unwrap_err();

        assert!(matches!(err, BuildError::Css { ref file, .. } if file == &entry));
    }

    #[test]
    fn stylesheet_detection_uses_extension() {
        assert!(is_stylesheet(Path::new("a/b/style.css")));
        assert!(!is_stylesheet(Path::new("a/b/app.js")));
        assert!(!is_stylesheet(Path::new("a/b/css")));
    }
}
