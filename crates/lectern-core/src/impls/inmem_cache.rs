//! InMemoryHashCache - 開発用の Fast Cache
//!
//! # 実装詳細
//! - HashMap<String, Bucket> でキーごとにフィールドを管理
//! - キーごとに有効期限（tokio の Instant）を持つ
//! - 期限切れのキーは読み取り時に遅延削除
//! - 書き込み時にも、前回の掃除から TTL 分経っていれば期限切れのキーを一括削除
//!   （二度と読まれないキーが HashMap に残り続けないように）

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::domain::CacheError;
use crate::ports::HashCache;

struct Bucket {
    fields: HashMap<String, String>,
    expires_at: Instant,
}

impl Bucket {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// InMemoryHashCache は Redis の hash + EXPIRE を模倣する
///
/// # 使用例
/// ```ignore
/// let cache = InMemoryHashCache::new();
/// cache.put_field("learning:record:1", "2", json, Duration::from_secs(60)).await?;
/// ```
#[derive(Default)]
pub struct InMemoryHashCache {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    buckets: HashMap<String, Bucket>,
    /// Earliest instant at which the next write sweeps expired keys.
    next_sweep: Option<Instant>,
}

impl State {
    fn sweep_if_due(&mut self, now: Instant, ttl: Duration) {
        if self.next_sweep.is_some_and(|at| now < at) {
            return;
        }
        self.buckets.retain(|_, bucket| !bucket.is_expired(now));
        self.next_sweep = Some(now + ttl);
    }
}

impl InMemoryHashCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys (for tests and the demo).
    pub fn key_count(&self) -> usize {
        let now = Instant::now();
        self.state
            .lock()
            .buckets
            .values()
            .filter(|bucket| !bucket.is_expired(now))
            .count()
    }
}

#[async_trait]
impl HashCache for InMemoryHashCache {
    async fn put_field(
        &self,
        key: &str,
        field: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut state = self.state.lock();
        state.sweep_if_due(now, ttl);

        let bucket = state.buckets.entry(key.to_string()).or_insert_with(|| Bucket {
            fields: HashMap::new(),
            expires_at: now,
        });
        if bucket.is_expired(now) {
            bucket.fields.clear();
        }
        bucket.fields.insert(field.to_string(), value);
        bucket.expires_at = now + ttl;
        Ok(())
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let mut state = self.state.lock();
        let buckets = &mut state.buckets;
        let Some(bucket) = buckets.get(key) else {
            return Ok(None);
        };
        if bucket.is_expired(now) {
            buckets.remove(key);
            return Ok(None);
        }
        Ok(bucket.fields.get(field).cloned())
    }

    async fn delete_field(&self, key: &str, field: &str) -> Result<(), CacheError> {
        let mut state = self.state.lock();
        let buckets = &mut state.buckets;
        if let Some(bucket) = buckets.get_mut(key) {
            bucket.fields.remove(field);
            if bucket.fields.is_empty() {
                buckets.remove(key);
            }
        }
        Ok(())
    }
}
