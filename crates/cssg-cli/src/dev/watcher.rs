//! Recursive file system watcher bridged into tokio.
//!
//! Raw notify events are forwarded unfiltered; the caller runs them through a
//! [`ChangeFilter`](crate::dev::ChangeFilter).

use crate::dev::filter::ChangeEvent;
use crate::error::{CliError, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Events buffered between the notify thread and the dev loop.
const EVENT_BUFFER: usize = 256;

/// Watches a directory tree for as long as it is alive.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `root` recursively.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::FileNotFound`] if `root` does not exist, or
    /// [`CliError::Watch`] if the platform watcher cannot be set up.
    pub fn new(root: PathBuf) -> Result<(Self, mpsc::Receiver<ChangeEvent>)> {
        if !root.exists() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event.paths.is_empty() {
                    return;
                }
                // Runs on notify's own thread, so blocking here is fine.
                let _ = tx.blocking_send(ChangeEvent::from(event));
            }
            Err(err) => tracing::warn!(error = %err, "file watcher error"),
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::debug!(root = %root.display(), "watching for changes");

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
