//! Lightweight dispatcher counters, mirroring the `BatcherMetrics`/
//! `BatcherMetricsSnapshot` pair the teacher's `lib.rs` re-exports.
//! Read-only to applications; updated by the dispatcher at the same points
//! the teacher would (enqueue, flush success, drop, re-queue).

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct DispatcherMetrics {
    enqueued: AtomicU64,
    delivered: AtomicU64,
    dropped: AtomicU64,
    requeued: AtomicU64,
    http_calls: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherMetricsSnapshot {
    pub enqueued: u64,
    pub delivered: u64,
    pub dropped: u64,
    pub requeued: u64,
    pub http_calls: u64,
}

impl DispatcherMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_enqueued(&self, count: u64) {
        self.enqueued.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self, count: u64) {
        self.delivered.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self, count: u64) {
        self.dropped.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_requeued(&self, count: u64) {
        self.requeued.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_http_call(&self) {
        self.http_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatcherMetricsSnapshot {
        DispatcherMetricsSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            requeued: self.requeued.load(Ordering::Relaxed),
            http_calls: self.http_calls.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = DispatcherMetrics::new();
        metrics.record_enqueued(3);
        metrics.record_http_call();
        metrics.record_http_call();
        metrics.record_delivered(2);
        metrics.record_dropped(1);
        metrics.record_requeued(1);

        let snap = metrics.snapshot();
        assert_eq!(
            snap,
            DispatcherMetricsSnapshot {
                enqueued: 3,
                delivered: 2,
                dropped: 1,
                requeued: 1,
                http_calls: 2,
            }
        );
    }
}
