//! Optional metrics for monitoring ring and reader activity.
//!
//! Disabled by default (zero atomic traffic on the hot path); enable with
//! [`BroadcastRing::with_metrics`](crate::BroadcastRing::with_metrics) or the
//! `_with_metrics` reader constructor.

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for a single [`crate::BroadcastRing`].
///
/// Updated with `Relaxed` ordering: these are advisory counters, not part
/// of the synchronization protocol.
#[derive(Debug, Default)]
pub struct RingMetrics {
    items_published: AtomicU64,
}

impl RingMetrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_publish(&self) {
        self.items_published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> RingMetricsSnapshot {
        RingMetricsSnapshot {
            items_published: self.items_published.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of [`RingMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RingMetricsSnapshot {
    /// Total items successfully published via `enqueue`.
    pub items_published: u64,
}

/// Per-reader counters, owned by a single [`crate::Reader`] (no atomics
/// needed, since a `Reader` is never shared across threads).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderMetrics {
    /// Items returned by `read_next`/`try_read_next`.
    pub items_delivered: u64,
    /// Number of times `try_read_next` detected a version jump of more than
    /// one publish (an overrun).
    pub overruns_detected: u64,
    /// Total items known to have been skipped across all detected overruns.
    pub items_lost: u64,
}
