//! JSON data files exposed to every page.

use serde_json::{Map, Value};
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{io_at, BuildError, Result};

/// Load every `.json` file under `data_dir`.
///
/// The key is the path relative to `data_dir` without the extension, with `/`
/// separators: `data/blog/posts.json` becomes `blog/posts`.
pub(crate) fn load_data(data_dir: &Path) -> Result<Map<String, Value>> {
    let mut data = Map::new();
    if !data_dir.is_dir() {
        return Ok(data);
    }

    let mut files: Vec<_> = WalkDir::new(data_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();

    for file in files {
        let raw = std::fs::read_to_string(&file).map_err(io_at(&file))?;
        let value: Value = serde_json::from_str(&raw).map_err(|source| BuildError::Data {
            file: file.clone(),
            source,
        })?;
        data.insert(data_key(data_dir, &file), value);
    }

    Ok(data)
}

fn data_key(data_dir: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(data_dir).unwrap_or(file).with_extension("");
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn keys_follow_relative_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("blog")).unwrap();
        std::fs::write(dir.path().join("projects.json"), r#"[{"name":"cssg"}]"#).unwrap();
        std::fs::write(dir.path().join("blog/posts.json"), r#"{"count":2}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let data = load_data(dir.path()).unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data["projects"][0]["name"], "cssg");
        assert_eq!(data["blog/posts"]["count"], 2);
    }

    #[test]
    fn malformed_json_names_the_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ nope").unwrap();

        match load_data(dir.path()) {
            Err(BuildError::Data { file, .. }) => assert!(file.ends_with("bad.json")),
            other => panic!("expected data error, got {other:?}"),
        }
    }
}
