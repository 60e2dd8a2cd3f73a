//! Modification-time checked cache for served HTML files.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// One cached file.
#[derive(Debug, Clone)]
pub struct CachedFile {
    pub content: Arc<str>,
    /// Modification time observed when `content` was read.
    pub modified: SystemTime,
}

/// Caches file text keyed by path.
///
/// An entry is served only while its recorded modification time is at least
/// the file's current one; otherwise the file is read again. Entries are
/// replaced whole, so concurrent refreshes of the same file race harmlessly.
#[derive(Debug, Default)]
pub struct FileCache {
    entries: RwLock<HashMap<PathBuf, CachedFile>>,
    disk_reads: AtomicUsize,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the text of `path`, reading it from disk only when stale.
    ///
    /// # Errors
    ///
    /// [`CacheError::NotFound`] if the file is missing or unreadable. Any
    /// cached entry for it is evicted first.
    pub async fn get(&self, path: &Path) -> Result<Arc<str>, CacheError> {
        let modified = match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            _ => return Err(self.evict(path)),
        };

        if let Some(hit) = self.entries.read().get(path) {
            if hit.modified >= modified {
                return Ok(Arc::clone(&hit.content));
            }
        }

        let content: Arc<str> = match tokio::fs::read_to_string(path).await {
            Ok(text) => text.into(),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "cache refresh failed");
                return Err(self.evict(path));
            }
        };
        self.disk_reads.fetch_add(1, Ordering::Relaxed);

        self.entries.write().insert(
            path.to_path_buf(),
            CachedFile {
                content: Arc::clone(&content),
                modified,
            },
        );
        Ok(content)
    }

    /// Number of times a file was read from disk.
    pub fn disk_reads(&self) -> usize {
        self.disk_reads.load(Ordering::Relaxed)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.read().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn evict(&self, path: &Path) -> CacheError {
        self.entries.write().remove(path);
        CacheError::NotFound(path.to_path_buf())
    }
}
