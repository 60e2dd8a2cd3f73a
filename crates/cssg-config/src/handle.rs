//! Shared, swappable configuration snapshot.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::ResolvedConfig;

/// Cloneable handle to the configuration currently in effect.
///
/// Readers take a cheap `Arc` snapshot and keep using it for the rest of
/// their work even if a reload swaps in a newer value meanwhile.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<Arc<ResolvedConfig>>>,
}

impl ConfigHandle {
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Snapshot of the current configuration.
    pub fn current(&self) -> Arc<ResolvedConfig> {
        Arc::clone(&self.inner.read())
    }

    /// Replace the configuration wholesale, returning the previous snapshot.
    pub fn replace(&self, config: ResolvedConfig) -> Arc<ResolvedConfig> {
        std::mem::replace(&mut *self.inner.write(), Arc::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_does_not_touch_existing_snapshots() {
        let handle = ConfigHandle::new(ResolvedConfig::default_for("/a"));
        let before = handle.current();

        let previous = handle.replace(ResolvedConfig::default_for("/b"));

        assert_eq!(before.root, std::path::PathBuf::from("/a"));
        assert_eq!(previous.root, before.root);
        assert_eq!(handle.current().root, std::path::PathBuf::from("/b"));
    }

    #[test]
    fn clones_share_the_same_slot() {
        let handle = ConfigHandle::new(ResolvedConfig::default_for("/a"));
        let other = handle.clone();
        handle.replace(ResolvedConfig::default_for("/c"));
        assert_eq!(other.current().root, std::path::PathBuf::from("/c"));
    }
}
