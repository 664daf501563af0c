use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::domain::DiscardReason;

/// Point-in-time view of the debouncer's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceCounts {
    pub submitted: u64,
    pub committed: u64,
    pub superseded: u64,
    pub missing: u64,
    pub failed: u64,
    /// Tasks still waiting in the delay queue.
    pub pending: usize,
}

/// Shared counters bumped by ingress and the commit loop.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    submitted: AtomicU64,
    committed: AtomicU64,
    superseded: AtomicU64,
    missing: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    pub(crate) fn submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn committed(&self) {
        self.committed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn discarded(&self, reason: DiscardReason) {
        let counter = match reason {
            DiscardReason::Missing => &self.missing,
            DiscardReason::Superseded => &self.superseded,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, pending: usize) -> DebounceCounts {
        DebounceCounts {
            submitted: self.submitted.load(Ordering::Relaxed),
            committed: self.committed.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
            missing: self.missing.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            pending,
        }
    }
}
