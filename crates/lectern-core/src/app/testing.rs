//! Fault-injecting port doubles shared by the app tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{CacheError, LessonUpdate, RecordUpdate, StoreError};
use crate::impls::{InMemoryHashCache, InMemoryLearningStore};
use crate::ports::{HashCache, LearningStore};

/// In-memory cache that can be switched into an outage.
#[derive(Default)]
pub struct FlakyCache {
    inner: InMemoryHashCache,
    down: AtomicBool,
    failing_reads: AtomicUsize,
}

impl FlakyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_all(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Fail the next `n` reads only.
    pub fn fail_next_reads(&self, n: usize) {
        self.failing_reads.store(n, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("simulated outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl HashCache for FlakyCache {
    async fn put_field(
        &self,
        key: &str,
        field: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.check()?;
        self.inner.put_field(key, field, value, ttl).await
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, CacheError> {
        self.check()?;
        let consumed = self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if consumed.is_ok() {
            return Err(CacheError::Unavailable("simulated read outage".into()));
        }
        self.inner.get_field(key, field).await
    }

    async fn delete_field(&self, key: &str, field: &str) -> Result<(), CacheError> {
        self.check()?;
        self.inner.delete_field(key, field).await
    }
}

/// What the next record update should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Fail,
    Panic,
}

/// Spy store whose next record updates can fail or panic.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: InMemoryLearningStore,
    faults: parking_lot::Mutex<Vec<Fault>>,
}

impl FaultyStore {
    pub fn new(inner: InMemoryLearningStore) -> Self {
        Self {
            inner,
            faults: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Queue faults; each applies to one `update_record` call, in order.
    pub fn inject(&self, faults: &[Fault]) {
        self.faults.lock().extend_from_slice(faults);
    }
}

#[async_trait]
impl LearningStore for FaultyStore {
    async fn update_record(&self, update: RecordUpdate) -> Result<(), StoreError> {
        let fault = {
            let mut queued = self.faults.lock();
            if queued.is_empty() {
                None
            } else {
                Some(queued.remove(0))
            }
        };
        match fault {
            Some(Fault::Fail) => Err(StoreError::Unavailable("simulated store outage".into())),
            Some(Fault::Panic) => panic!("simulated store panic"),
            None => self.inner.update_record(update).await,
        }
    }

    async fn update_lesson(&self, update: LessonUpdate) -> Result<(), StoreError> {
        self.inner.update_lesson(update).await
    }
}
