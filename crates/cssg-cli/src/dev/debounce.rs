//! Resettable quiet-period timer that coalesces bursts into one batch.
//!
//! Every [`Debouncer::push`] adds items to the pending batch and restarts the
//! timer. When the timer survives a full quiet period, the whole batch is
//! handed to the callback exactly once.
//!
//! Each arm bumps a generation counter. A timer task only fires if, after its
//! sleep, the generation under the lock still matches the one it was armed
//! with; aborting the superseded task is only an optimization. This makes
//! "reset" and "fire" mutually exclusive even when a push races the wakeup.

use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

type FireFn<T> = dyn Fn(BTreeSet<T>) + Send + Sync;

struct Pending<T> {
    batch: BTreeSet<T>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Coalescing timer. Must be used from within a tokio runtime.
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Arc<Mutex<Pending<T>>>,
    on_fire: Arc<FireFn<T>>,
}

impl<T> Debouncer<T>
where
    T: Ord + Send + 'static,
{
    /// Create a debouncer that calls `on_fire` with each settled batch.
    ///
    /// `on_fire` runs on the timer task and should not block.
    pub fn new<F>(quiet: Duration, on_fire: F) -> Self
    where
        F: Fn(BTreeSet<T>) + Send + Sync + 'static,
    {
        Self {
            quiet,
            pending: Arc::new(Mutex::new(Pending {
                batch: BTreeSet::new(),
                generation: 0,
                timer: None,
            })),
            on_fire: Arc::new(on_fire),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Add `items` to the pending batch and (re)start the quiet period.
    pub fn push(&self, items: impl IntoIterator<Item = T>) {
        let mut pending = self.pending.lock();
        pending.batch.extend(items);
        pending.generation = pending.generation.wrapping_add(1);
        let armed_at = pending.generation;

        if let Some(stale) = pending.timer.take() {
            stale.abort();
        }

        let shared = Arc::clone(&self.pending);
        let on_fire = Arc::clone(&self.on_fire);
        let quiet = self.quiet;
        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;

            let batch = {
                let mut pending = shared.lock();
                if pending.generation != armed_at {
                    return;
                }
                pending.timer = None;
                std::mem::take(&mut pending.batch)
            };

            if !batch.is_empty() {
                on_fire(batch);
            }
        }));
    }

    /// Drop the pending batch and disarm the timer.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock();
        pending.batch.clear();
        pending.generation = pending.generation.wrapping_add(1);
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
    }

    /// Whether a timer is waiting to fire.
    pub fn is_armed(&self) -> bool {
        self.pending.lock().timer.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.lock().batch.len()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.lock().timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn recording(quiet_ms: u64) -> (Debouncer<u32>, mpsc::UnboundedReceiver<BTreeSet<u32>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(Duration::from_millis(quiet_ms), move |batch| {
            let _ = tx.send(batch);
        });
        (debouncer, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_fires_once_with_union() {
        let (debouncer, mut rx) = recording(100);

        debouncer.push([1]);
        tokio::time::sleep(Duration::from_millis(40)).await;
        debouncer.push([2, 3]);
        tokio::time::sleep(Duration::from_millis(40)).await;
        debouncer.push([1]);
        assert!(debouncer.is_armed());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(rx.try_recv().unwrap(), BTreeSet::from([1, 2, 3]));
        assert!(rx.try_recv().is_err());
        assert!(!debouncer.is_armed());
        assert_eq!(debouncer.pending_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_delays_firing() {
        let (debouncer, mut rx) = recording(100);

        debouncer.push([1]);
        tokio::time::sleep(Duration::from_millis(90)).await;
        debouncer.push([2]);
        tokio::time::sleep(Duration::from_millis(90)).await;
        assert!(rx.try_recv().is_err(), "timer fired before a full quiet period");

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(rx.try_recv().unwrap(), BTreeSet::from([1, 2]));
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_pushes_fire_separately() {
        let (debouncer, mut rx) = recording(100);

        debouncer.push([1]);
        tokio::time::sleep(Duration::from_millis(150)).await;
        debouncer.push([2]);
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(rx.try_recv().unwrap(), BTreeSet::from([1]));
        assert_eq!(rx.try_recv().unwrap(), BTreeSet::from([2]));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_batch() {
        let (debouncer, mut rx) = recording(100);

        debouncer.push([1]);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(rx.try_recv().is_err());
        assert!(!debouncer.is_armed());
    }
}
