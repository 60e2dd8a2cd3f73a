//! Debounced rebuild trigger.
//!
//! Filtered change sets are pushed into a [`Debouncer`]. When the quiet period
//! passes, the settled batch takes the build gate and is handed to the
//! [`BuildExecutor`]; a successful outcome is broadcast to every client.
//! Changes that arrive while a build holds the gate are dropped, not queued.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::dev::clients::ClientRegistry;
use crate::dev::debounce::Debouncer;
use crate::dev::executor::{BuildExecutor, RunStatus};

/// What [`BuildTrigger::notify`] did with a change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    /// Added to the pending batch; the quiet period restarted.
    Armed,
    /// A build was running, so the change set was discarded.
    Dropped,
    /// Nothing to do for an empty change set.
    Ignored,
}

pub struct BuildTrigger {
    executor: Arc<BuildExecutor>,
    debouncer: Debouncer<PathBuf>,
}

impl BuildTrigger {
    /// Must be called from within a tokio runtime.
    pub fn new(executor: Arc<BuildExecutor>, clients: ClientRegistry, quiet: Duration) -> Self {
        let fire_executor = Arc::clone(&executor);
        let debouncer = Debouncer::new(quiet, move |changed: BTreeSet<PathBuf>| {
            let Some(permit) = fire_executor.gate().try_acquire() else {
                tracing::info!(
                    changed = changed.len(),
                    "build already in progress, dropping settled changes"
                );
                return;
            };

            let executor = Arc::clone(&fire_executor);
            let clients = clients.clone();
            tokio::spawn(async move {
                if let RunStatus::Completed(outcome) = executor.execute(permit, changed).await {
                    clients.broadcast_all(&outcome.notifications());
                }
            });
        });

        Self {
            executor,
            debouncer,
        }
    }

    /// Feed a filtered change set into the debouncer.
    pub fn notify(&self, changed: BTreeSet<PathBuf>) -> TriggerDecision {
        if changed.is_empty() {
            return TriggerDecision::Ignored;
        }

        if self.executor.gate().is_busy() {
            tracing::info!(paths = ?changed, "build in progress, ignoring change");
            return TriggerDecision::Dropped;
        }

        tracing::debug!(paths = ?changed, "change queued for rebuild");
        self.debouncer.push(changed);
        TriggerDecision::Armed
    }

    pub fn quiet_period(&self) -> Duration {
        self.debouncer.quiet_period()
    }

    /// Discard any batch still waiting for its quiet period, returning how
    /// many paths were dropped. A build already running is left to finish.
    pub fn shutdown(&self) -> usize {
        let discarded = self.debouncer.pending_len();
        self.debouncer.cancel();
        discarded
    }

    /// Whether a rebuild is waiting for the quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_armed()
    }

    pub fn executor(&self) -> &Arc<BuildExecutor> {
        &self.executor
    }
}
