//! Build coordination state for the development server.
//!
//! [`BuildGate`] is the single "build in progress" flag. Whoever wins
//! [`BuildGate::try_acquire`] holds a [`BuildPermit`]; the gate reopens when
//! the permit is dropped, whether the build succeeded, failed or panicked.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Build status tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// No build has been performed yet
    NotStarted,
    /// Build is currently in progress
    InProgress { started_at: Instant },
    /// Build completed successfully
    Success { duration: Duration },
    /// Build failed with error
    Failed { error: String },
}

impl BuildStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, BuildStatus::InProgress { .. })
    }

    /// Get error message if failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            BuildStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// At-most-one-build flag shared by the trigger and the executor.
#[derive(Debug, Clone, Default)]
pub struct BuildGate {
    busy: Arc<AtomicBool>,
}

impl BuildGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Atomically flip the gate from idle to busy.
    ///
    /// Returns `None` if a build is already running.
    pub fn try_acquire(&self) -> Option<BuildPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BuildPermit {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Proof of holding the build gate. Reopens the gate on drop.
#[derive(Debug)]
pub struct BuildPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for BuildPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Last known build status, shared between the executor and observers.
#[derive(Debug, Clone)]
pub struct StatusCell {
    inner: Arc<RwLock<BuildStatus>>,
}

impl Default for StatusCell {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(BuildStatus::NotStarted)),
        }
    }
}

impl StatusCell {
    pub fn get(&self) -> BuildStatus {
        self.inner.read().clone()
    }

    pub fn set(&self, status: BuildStatus) {
        *self.inner.write() = status;
    }
}
