//! Countdown barrier released by drop guards

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug)]
struct Inner {
    remaining: AtomicUsize,
    signals: AtomicUsize,
    notify: Notify,
}

/// Blocks waiters until `count` signals have arrived.
///
/// Signals come from [`CountdownGuard`]s, which count down exactly once when
/// dropped. A task that holds a guard therefore signals on every exit path:
/// normal return, early return, cancellation, panic, or `JoinHandle::abort`.
#[derive(Debug, Clone)]
pub struct CountdownBarrier {
    inner: Arc<Inner>,
}

impl CountdownBarrier {
    pub fn new(count: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                remaining: AtomicUsize::new(count),
                signals: AtomicUsize::new(0),
                notify: Notify::new(),
            }),
        }
    }

    /// Hand out a guard that counts down once when dropped.
    pub fn guard(&self) -> CountdownGuard {
        CountdownGuard {
            barrier: self.clone(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.inner.remaining.load(Ordering::Acquire)
    }

    /// Guards released so far, including any beyond the initial count.
    pub fn signals(&self) -> usize {
        self.inner.signals.load(Ordering::Acquire)
    }

    pub fn is_released(&self) -> bool {
        self.remaining() == 0
    }

    fn count_down(&self) {
        self.inner.signals.fetch_add(1, Ordering::AcqRel);
        // Saturates at zero; surplus guards never wrap the counter.
        let previous = self
            .inner
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        if previous == Ok(1) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Wait until the count reaches zero.
    pub async fn wait(&self) {
        loop {
            // Registered before the check so a release in between is not missed.
            let notified = self.inner.notify.notified();
            if self.is_released() {
                return;
            }
            notified.await;
        }
    }

    /// Wait at most `limit`; returns whether the barrier was released.
    pub async fn wait_timeout(&self, limit: Duration) -> bool {
        tokio::time::timeout(limit, self.wait()).await.is_ok()
    }
}

/// Counts its barrier down when dropped.
#[derive(Debug)]
#[must_use = "dropping the guard signals the barrier immediately"]
pub struct CountdownGuard {
    barrier: CountdownBarrier,
}

impl CountdownGuard {
    /// Signal now rather than at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for CountdownGuard {
    fn drop(&mut self) {
        self.barrier.count_down();
    }
}
