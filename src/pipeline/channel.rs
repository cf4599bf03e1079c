//! Many-producer / single-consumer handoff of completed results, with a coalesced wake-up.
//!
//! Workers post through a [`ResultPoster`]; the interactive thread owns the [`ResultChannel`] and
//! drains it. The first post after a drain raises one wake notification; further posts before
//! the next drain only enqueue.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::types::EnrichResult;

/// Extra hook run on each wake-up, e.g. to post a message to a UI event loop.
pub type WakeNotifier = Box<dyn Fn() + Send + Sync>;

struct WakeState {
    pending: AtomicBool,
    wakeups: AtomicUsize,
    wake_tx: Sender<()>,
    notifier: Option<WakeNotifier>,
}

impl WakeState {
    fn raise(&self) {
        if self.pending.swap(true, Ordering::AcqRel) {
            return;
        }
        self.wakeups.fetch_add(1, Ordering::Relaxed);
        // Capacity 1: a wake token already sitting there is as good as a new one.
        match self.wake_tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => return,
        }
        if let Some(notify) = &self.notifier {
            notify();
        }
    }
}

/// Sending half handed to workers. Cheap to clone.
#[derive(Clone)]
pub struct ResultPoster {
    tx: Sender<EnrichResult>,
    wake: Arc<WakeState>,
}

impl ResultPoster {
    /// Enqueue `result` and raise a wake-up unless one is already pending. Never blocks.
    pub fn post(&self, result: EnrichResult) {
        if self.tx.send(result).is_err() {
            log::debug!("result channel closed; dropping result");
            return;
        }
        self.wake.raise();
    }
}

/// Receiving half, owned by the interactive thread.
pub struct ResultChannel {
    rx: Receiver<EnrichResult>,
    wake_rx: Receiver<()>,
    poster: ResultPoster,
}

impl Default for ResultChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultChannel {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Like [`ResultChannel::new`], but also call `notifier` on every wake-up (from the posting
    /// worker thread).
    pub fn with_notifier<F>(notifier: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::build(Some(Box::new(notifier)))
    }

    fn build(notifier: Option<WakeNotifier>) -> Self {
        let (tx, rx) = unbounded::<EnrichResult>();
        let (wake_tx, wake_rx) = bounded::<()>(1);
        let wake = Arc::new(WakeState {
            pending: AtomicBool::new(false),
            wakeups: AtomicUsize::new(0),
            wake_tx,
            notifier,
        });
        Self {
            rx,
            wake_rx,
            poster: ResultPoster { tx, wake },
        }
    }

    /// A new sending half for a worker.
    pub fn poster(&self) -> ResultPoster {
        self.poster.clone()
    }

    /// Everything posted since the last drain, in posting order.
    ///
    /// The wake token is consumed and the pending flag cleared before collecting, so a result
    /// posted during the drain either lands in this batch or raises a fresh wake-up.
    pub fn drain(&self) -> Vec<EnrichResult> {
        let _ = self.wake_rx.try_recv();
        self.poster.wake.pending.store(false, Ordering::Release);
        self.rx.try_iter().collect()
    }

    /// Block until a wake-up arrives or `timeout` passes. Returns true when woken.
    pub fn wait_for_wake(&self, timeout: Duration) -> bool {
        self.wake_rx.recv_timeout(timeout).is_ok()
    }

    /// True if a wake-up was raised and not yet drained.
    pub fn wake_pending(&self) -> bool {
        self.poster.wake.pending.load(Ordering::Acquire)
    }

    /// Total wake-ups raised so far.
    pub fn wake_count(&self) -> usize {
        self.poster.wake.wakeups.load(Ordering::Relaxed)
    }

    /// Results waiting to be drained.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
