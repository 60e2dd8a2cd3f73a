//! Public directory copy.

use std::path::Path;
use walkdir::WalkDir;

use crate::error::{io_at, Result};

/// Copy `public_dir` recursively over `out_dir`, overwriting existing files.
///
/// Returns the number of files copied. A missing public directory is not an
/// error.
pub(crate) fn copy_public(public_dir: &Path, out_dir: &Path) -> Result<usize> {
    if !public_dir.is_dir() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(public_dir).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(public_dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            crate::BuildError::Io { path, source }
        })?;

        let rel = entry.path().strip_prefix(public_dir).unwrap_or(entry.path());
        let target = out_dir.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(io_at(&target))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(io_at(parent))?;
            }
            std::fs::copy(entry.path(), &target).map_err(io_at(entry.path()))?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn copies_nested_files_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().join("public");
        let out = dir.path().join("dist");
        std::fs::create_dir_all(public.join("img")).unwrap();
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(public.join("robots.txt"), "User-agent: *").unwrap();
        std::fs::write(public.join("img/logo.svg"), "<svg/>").unwrap();
        std::fs::write(out.join("robots.txt"), "stale").unwrap();

        let copied = copy_public(&public, &out).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(std::fs::read_to_string(out.join("robots.txt")).unwrap(), "User-agent: *");
        assert!(out.join("img/logo.svg").is_file());
    }

    #[test]
    fn missing_public_dir_is_skipped() {
        let dir = TempDir::new().unwrap();
        assert_eq!(copy_public(&dir.path().join("public"), dir.path()).unwrap(), 0);
    }
}
