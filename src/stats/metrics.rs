//! Statistics and metrics for hub delivery
//!
//! Counters are updated from the shared-lock delivery paths, so they are plain
//! relaxed atomics. They describe the hub's whole lifetime and are not cleared
//! when the registry is reset.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live delivery counters owned by a hub
#[derive(Debug, Default)]
pub struct HubMetrics {
    delivered: AtomicU64,
    dropped: AtomicU64,
    unknown_target: AtomicU64,
    floods: AtomicU64,
}

impl HubMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_delivered(&self, n: u64) {
        if n > 0 {
            self.delivered.fetch_add(n, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_dropped(&self, n: u64) {
        if n > 0 {
            self.dropped.fetch_add(n, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_unknown_target(&self) {
        self.unknown_target.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_flood(&self) {
        self.floods.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of the counters
    pub fn snapshot(&self) -> HubStats {
        HubStats {
            delivered: self.delivered.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            unknown_target: self.unknown_target.load(Ordering::Relaxed),
            floods: self.floods.load(Ordering::Relaxed),
        }
    }
}

/// Hub-wide delivery statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubStats {
    /// Messages enqueued onto a subscriber channel
    pub delivered: u64,
    /// Unicast sends to a full/closed channel plus broadcast skips
    pub dropped: u64,
    /// Unicast sends addressed to an unregistered identity
    pub unknown_target: u64,
    /// Broadcast calls made
    pub floods: u64,
}

impl HubStats {
    /// Fraction of delivery attempts that were dropped
    pub fn drop_ratio(&self) -> f64 {
        let attempts = self.delivered + self.dropped;
        if attempts > 0 {
            self.dropped as f64 / attempts as f64
        } else {
            0.0
        }
    }
}
