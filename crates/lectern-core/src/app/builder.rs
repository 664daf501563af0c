//! DebouncerBuilder - アプリケーションの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - watch チャネルによる graceful shutdown

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use super::commit_loop::CommitLoop;
use super::config::DebounceConfig;
use super::ingress::ProgressIngress;
use super::progress_cache::ProgressCache;
use crate::domain::{CommitTask, ConfigError, LifecycleError};
use crate::observability::{Counters, DebounceCounts};
use crate::ports::{Clock, HashCache, LearningStore, RevisionGenerator, SystemClock, UlidRevisions};
use crate::queue::DelayQueue;

/// DebouncerBuilder は Debouncer を構築
///
/// # 使用例
/// ```ignore
/// let debouncer = DebouncerBuilder::new(cache, store)
///     .config(DebounceConfig::default())
///     .build()?;
/// let handle = debouncer.start()?;
/// handle.ingress().submit(snapshot).await;
/// handle.stop().await?;
/// ```
///
/// # Fail-fast 設計
/// - build() 時に設定を検証
/// - TTL が静穏期間より短いと、すべてのタスクが「キャッシュ無し」で捨てられるので拒否する
pub struct DebouncerBuilder {
    cache: Arc<dyn HashCache>,
    store: Arc<dyn LearningStore>,
    config: DebounceConfig,
    clock: Arc<dyn Clock>,
    revisions: Option<Arc<dyn RevisionGenerator>>,
}

impl DebouncerBuilder {
    pub fn new(cache: Arc<dyn HashCache>, store: Arc<dyn LearningStore>) -> Self {
        Self {
            cache,
            store,
            config: DebounceConfig::default(),
            clock: Arc::new(SystemClock),
            revisions: None,
        }
    }

    pub fn config(mut self, config: DebounceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn revisions(mut self, revisions: Arc<dyn RevisionGenerator>) -> Self {
        self.revisions = Some(revisions);
        self
    }

    pub fn build(self) -> Result<Debouncer, ConfigError> {
        self.config.validate()?;

        let config = Arc::new(self.config);
        let queue = Arc::new(DelayQueue::new());
        let counters = Arc::new(Counters::default());
        let cache = ProgressCache::new(self.cache, config.cache_ttl);
        let revisions: Arc<dyn RevisionGenerator> = match self.revisions {
            Some(revisions) => revisions,
            None => Arc::new(UlidRevisions::new(SystemClock)),
        };

        let ingress = ProgressIngress::new(
            cache.clone(),
            Arc::clone(&queue),
            revisions,
            Arc::clone(&config),
            Arc::clone(&counters),
        );
        let commit_loop = CommitLoop::new(
            Arc::clone(&queue),
            cache,
            self.store,
            self.clock,
            Arc::clone(&counters),
        );

        Ok(Debouncer {
            ingress,
            commit_loop,
            queue,
            counters,
        })
    }
}

/// A wired but not yet running debouncer.
pub struct Debouncer {
    ingress: ProgressIngress,
    commit_loop: CommitLoop,
    queue: Arc<DelayQueue<CommitTask>>,
    counters: Arc<Counters>,
}

impl Debouncer {
    /// Producer handle; updates submitted before `start` wait in the queue.
    ///
    /// The handle (and its clones) stop scheduling commits once
    /// `DebouncerHandle::stop` is called.
    pub fn ingress(&self) -> ProgressIngress {
        self.ingress.clone()
    }

    /// Spawn the commit loop on the current tokio runtime. Does not block.
    pub fn start(self) -> Result<DebouncerHandle, LifecycleError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| LifecycleError::NoRuntime)?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = runtime.spawn(self.commit_loop.run(shutdown_rx));

        Ok(DebouncerHandle {
            ingress: self.ingress,
            queue: self.queue,
            counters: self.counters,
            shutdown_tx,
            join,
        })
    }
}

/// Running debouncer.
/// - `stop()` で shutdown を通知してワーカーの終了を待つ
/// - `self` を消費するので stop は 1 回しか呼べない
pub struct DebouncerHandle {
    ingress: ProgressIngress,
    queue: Arc<DelayQueue<CommitTask>>,
    counters: Arc<Counters>,
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl DebouncerHandle {
    pub fn ingress(&self) -> ProgressIngress {
        self.ingress.clone()
    }

    pub fn counts(&self) -> DebounceCounts {
        self.counters.snapshot(self.queue.len())
    }

    /// Tasks still waiting for their deadline.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Signal shutdown and wait for the commit loop to exit.
    ///
    /// Pending tasks are dropped; in-flight state is memory-only.
    /// Ingress handles cloned earlier are closed first, so later submissions
    /// only refresh the cache.
    pub async fn stop(self) -> Result<(), LifecycleError> {
        self.ingress.close();
        // ignore send error: the loop may already be gone, join tells us why
        let _ = self.shutdown_tx.send(true);
        self.join.await?;
        info!(dropped = self.queue.len(), "debouncer stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::impls::{InMemoryHashCache, InMemoryLearningStore};

    fn builder() -> DebouncerBuilder {
        DebouncerBuilder::new(
            Arc::new(InMemoryHashCache::new()),
            Arc::new(InMemoryLearningStore::new()),
        )
    }

    #[test]
    fn test_build_success() {
        assert!(builder().build().is_ok());
    }

    #[test]
    fn test_build_rejects_short_ttl() {
        let result = builder()
            .config(DebounceConfig::new(
                Duration::from_secs(20),
                Duration::from_secs(10),
            ))
            .build();
        assert!(matches!(result, Err(ConfigError::TtlTooShort { .. })));
    }

    #[test]
    fn test_start_without_runtime_fails() {
        let debouncer = builder().build().unwrap();
        assert!(matches!(debouncer.start(), Err(LifecycleError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_start_and_stop() {
        let handle = builder().build().unwrap().start().unwrap();
        assert_eq!(handle.counts(), DebounceCounts::default());
        handle.stop().await.unwrap();
    }
}
