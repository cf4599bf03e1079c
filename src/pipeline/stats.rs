use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by the pool and its workers.
#[derive(Debug, Default)]
pub struct PoolStats {
    submitted: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    superseded: AtomicUsize,
    dropped: AtomicUsize,
    /// Jobs queued or running.
    outstanding: AtomicUsize,
}

/// Point-in-time copy of [`PoolStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStatsSnapshot {
    pub submitted: usize,
    pub completed: usize,
    pub failed: usize,
    pub superseded: usize,
    pub dropped: usize,
    pub outstanding: usize,
}

impl PoolStats {
    pub(crate) fn record_queued(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        self.outstanding.fetch_add(1, Ordering::AcqRel);
    }

    /// A waiting job was replaced: one more submission, no more work.
    pub(crate) fn record_superseded(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        self.superseded.fetch_add(1, Ordering::Relaxed);
    }

    /// The oldest waiting job was dropped for a new one: no more work either.
    pub(crate) fn record_dropped(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn finish_one(&self) {
        self.outstanding.fetch_sub(1, Ordering::AcqRel);
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            outstanding: self.outstanding(),
        }
    }
}

/// Log pool counters after shutdown. Failed lookups are expected (locked files, offline shares)
/// and only summarised.
pub fn report_pool_stats(stats: &PoolStatsSnapshot) {
    log::debug!(
        "pool: {} submitted, {} completed, {} superseded, {} dropped",
        stats.submitted,
        stats.completed,
        stats.superseded,
        stats.dropped
    );
    if stats.failed > 0 {
        log::warn!(
            "{} metadata lookups failed; affected rows keep their placeholders",
            stats.failed
        );
    }
}
