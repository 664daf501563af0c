//! ProgressIngress - 進捗更新の受け口（ホットパス）
//!
//! # フロー
//! 1. リビジョンを発行して Fast Cache に上書き保存
//! 2. 期限 = now + 静穏期間 の `CommitTask` を作る
//! 3. DelayQueue に積む
//!
//! 永続ストアには一切触れません。
//! `DebouncerHandle::stop` の後はキャッシュだけ更新し、タスクは積みません（誰も消費しないため）。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use super::config::DebounceConfig;
use super::progress_cache::ProgressCache;
use crate::domain::{CommitTask, ProgressSnapshot, Revision};
use crate::observability::Counters;
use crate::ports::RevisionGenerator;
use crate::queue::{DelayQueue, Delayed};

/// Producer handle. Cheap to clone; safe to call from many tasks at once.
#[derive(Clone)]
pub struct ProgressIngress {
    cache: ProgressCache,
    queue: Arc<DelayQueue<CommitTask>>,
    revisions: Arc<dyn RevisionGenerator>,
    config: Arc<DebounceConfig>,
    counters: Arc<Counters>,
    /// Shared by every clone; set once the commit loop has been told to stop.
    closed: Arc<AtomicBool>,
}

impl ProgressIngress {
    pub(crate) fn new(
        cache: ProgressCache,
        queue: Arc<DelayQueue<CommitTask>>,
        revisions: Arc<dyn RevisionGenerator>,
        config: Arc<DebounceConfig>,
        counters: Arc<Counters>,
    ) -> Self {
        Self {
            cache,
            queue,
            revisions,
            config,
            counters,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop scheduling commits from this handle and all of its clones.
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Accept one progress update.
    ///
    /// Returns the revision written to the cache; only the task carrying the
    /// latest revision for a key can commit.
    pub async fn submit(&self, snapshot: ProgressSnapshot) -> Revision {
        let rev = self.revisions.next_revision();

        // 1. cache first, so the task never sees an older value than its own
        self.cache.write(&snapshot, rev).await;

        if self.is_closed() {
            warn!(
                lesson_id = %snapshot.lesson_id,
                section_id = %snapshot.section_id,
                moment = snapshot.moment,
                "debouncer stopped; update cached but not scheduled for commit"
            );
            return rev;
        }

        // 2. schedule the commit
        let delay = self.delay_for(&snapshot);
        let task = CommitTask::new(&snapshot, rev);
        self.queue.insert(Delayed::new(task, delay));
        self.counters.submitted();

        debug!(
            lesson_id = %snapshot.lesson_id,
            section_id = %snapshot.section_id,
            moment = snapshot.moment,
            delay_ms = delay.as_millis() as u64,
            "scheduled learning record commit"
        );
        rev
    }

    fn delay_for(&self, snapshot: &ProgressSnapshot) -> Duration {
        if self.config.flush_on_finish && snapshot.finished == Some(true) {
            Duration::ZERO
        } else {
            self.config.quiet_period
        }
    }
}
