//! Classification of raw filesystem events into rebuild-worthy paths.

use cssg_config::ResolvedConfig;
use notify::EventKind;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Directories whose contents never trigger a rebuild.
const IGNORED_DIRS: &[&str] = &[".git", ".hg", ".svn", "node_modules"];

/// Operating-system droppings.
const OS_ARTIFACTS: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Editor swap files, logs and other transient files.
const TRANSIENT_SUFFIXES: &[&str] = &[".log", ".tmp", ".swp", "~"];

/// Kind of a filesystem change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Modify,
    Remove,
    /// A read or open; nothing changed on disk.
    Access,
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Access(_) => ChangeKind::Access,
            EventKind::Create(_) => ChangeKind::Create,
            EventKind::Remove(_) => ChangeKind::Remove,
            // Modify, plus backends that cannot tell what happened.
            EventKind::Modify(_) | EventKind::Any | EventKind::Other => ChangeKind::Modify,
        }
    }
}

/// One raw filesystem notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub paths: Vec<PathBuf>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            kind,
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<notify::Event> for ChangeEvent {
    fn from(event: notify::Event) -> Self {
        Self {
            kind: ChangeKind::from(&event.kind),
            paths: event.paths,
        }
    }
}

/// Drops events and paths that cannot affect the built site.
///
/// Extra ignore rules come from `dev.ignore`: `*.ext` matches a suffix,
/// anything else matches a whole path component.
#[derive(Debug, Clone, Copy)]
pub struct ChangeFilter<'a> {
    config: &'a ResolvedConfig,
}

impl<'a> ChangeFilter<'a> {
    pub fn new(config: &'a ResolvedConfig) -> Self {
        Self { config }
    }

    /// Paths from `event` that should trigger a rebuild. Empty means "no trigger".
    pub fn filter(&self, event: &ChangeEvent) -> BTreeSet<PathBuf> {
        if event.kind == ChangeKind::Access {
            return BTreeSet::new();
        }
        event
            .paths
            .iter()
            .filter(|path| !self.should_ignore(path))
            .cloned()
            .collect()
    }

    pub fn should_ignore(&self, path: &Path) -> bool {
        if self.config.is_output(path) {
            return true;
        }
        let patterns = &self.config.dev.ignore;

        let name = path.file_name().and_then(OsStr::to_str).unwrap_or_default();
        if OS_ARTIFACTS.contains(&name) || TRANSIENT_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            return true;
        }

        for component in path.components() {
            let Some(part) = component.as_os_str().to_str() else {
                continue;
            };
            if IGNORED_DIRS.contains(&part) {
                return true;
            }
            if patterns.iter().any(|p| !p.starts_with('*') && p == part) {
                return true;
            }
        }

        patterns
            .iter()
            .filter_map(|p| p.strip_prefix('*'))
            .any(|suffix| name.ends_with(suffix))
    }
}
