//! A value paired with the instant it becomes eligible.

use std::cmp::Ordering;
use std::time::Duration;

use tokio::time::Instant;

/// Immutable value wrapped with a deadline.
///
/// Deadlines are tokio instants so paused test time applies to them.
#[derive(Debug, Clone)]
pub struct Delayed<T> {
    deadline: Instant,
    item: T,
}

impl<T> Delayed<T> {
    /// Eligible `delay` from now.
    pub fn new(item: T, delay: Duration) -> Self {
        Self::at(item, Instant::now() + delay)
    }

    pub fn at(item: T, deadline: Instant) -> Self {
        Self { deadline, item }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until eligible; zero once due.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_due(&self) -> bool {
        self.deadline <= Instant::now()
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn into_inner(self) -> T {
        self.item
    }
}

/// Heap entry.
///
/// We use Reverse ordering so BinaryHeap acts as a min-heap (earliest first).
/// Only the deadline takes part in the comparison; equal deadlines pop in any order.
pub(super) struct Entry<T>(pub(super) Delayed<T>);

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.deadline == other.0.deadline
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.deadline.cmp(&self.0.deadline)
    }
}
