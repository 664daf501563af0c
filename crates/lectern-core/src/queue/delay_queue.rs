//! In-memory delay queue.
//!
//! Many producers insert, one (or more) consumers wait for the earliest
//! deadline. Tasks leave only through `take_due`; there is no cancel.

use std::collections::BinaryHeap;

use parking_lot::Mutex;
use tokio::sync::Notify;

use super::delayed::{Delayed, Entry};

pub struct DelayQueue<T> {
    heap: Mutex<BinaryHeap<Entry<T>>>,
    /// Wakes consumers so they re-check the earliest deadline.
    notify: Notify,
}

impl<T> DelayQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: Mutex::new(BinaryHeap::new()),
            notify: Notify::new(),
        }
    }

    /// Add a task. Never blocks on the consumer.
    pub fn insert(&self, task: Delayed<T>) {
        self.heap.lock().push(Entry(task));
        // Notify outside the lock
        self.notify.notify_waiters();
    }

    pub fn push(&self, item: T, delay: std::time::Duration) {
        self.insert(Delayed::new(item, delay));
    }

    /// Pop the earliest task if its deadline has passed.
    pub fn try_take_due(&self) -> Option<Delayed<T>> {
        let mut heap = self.heap.lock();
        match heap.peek() {
            Some(entry) if entry.0.is_due() => heap.pop().map(|entry| entry.0),
            _ => None,
        }
    }

    /// Wait until the earliest task is due, then remove and return it.
    ///
    /// Cancel-safe: a task is only removed in the same poll that returns it.
    pub async fn take_due(&self) -> Delayed<T> {
        loop {
            // Register interest before looking at the heap, so an insert racing
            // with this check still wakes us.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let next_wake = {
                let mut heap = self.heap.lock();
                match heap.peek() {
                    Some(entry) if entry.0.is_due() => {
                        if let Some(entry) = heap.pop() {
                            return entry.0;
                        }
                        None
                    }
                    Some(entry) => Some(entry.0.deadline()),
                    None => None,
                }
            };

            // Wait for an insert OR the earliest deadline
            if let Some(wake_time) = next_wake {
                tokio::select! {
                    _ = &mut notified => {},
                    _ = tokio::time::sleep_until(wake_time) => {},
                }
            } else {
                notified.await;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.heap.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.lock().is_empty()
    }
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
