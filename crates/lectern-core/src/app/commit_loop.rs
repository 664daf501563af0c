//! CommitLoop - 遅延コミットの消費ループ
//!
//! # フロー
//! 1. DelayQueue::take_due() で期限の来たタスクを取得（shutdown と select で競合させる）
//! 2. Fast Cache から最新のスナップショットを読む
//! 3. `decide()` でコミットか破棄かを決める
//! 4. コミットなら学習記録の moment と課表の最新学習情報を更新
//!
//! 1 件の失敗（ストア障害・panic）でループを止めない。ログに残して次へ進む。

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::watch;
use tracing::{debug, error, info};

use super::progress_cache::ProgressCache;
use crate::domain::{
    CommitError, CommitTask, Decision, LessonUpdate, RecordUpdate, decide,
};
use crate::observability::Counters;
use crate::ports::{Clock, LearningStore};
use crate::queue::DelayQueue;

pub struct CommitLoop {
    queue: Arc<DelayQueue<CommitTask>>,
    cache: ProgressCache,
    store: Arc<dyn LearningStore>,
    clock: Arc<dyn Clock>,
    counters: Arc<Counters>,
}

impl CommitLoop {
    pub(crate) fn new(
        queue: Arc<DelayQueue<CommitTask>>,
        cache: ProgressCache,
        store: Arc<dyn LearningStore>,
        clock: Arc<dyn Clock>,
        counters: Arc<Counters>,
    ) -> Self {
        Self {
            queue,
            cache,
            store,
            clock,
            counters,
        }
    }

    /// Drain due tasks until `shutdown` flips to true or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("commit loop started");
        loop {
            // shutdown が来ていたら抜ける
            if *shutdown.borrow_and_update() {
                break;
            }

            // take_due は「待つ」ので select で shutdown と競合させる
            let task = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        // sender dropped: nobody can stop us any more, so stop now
                        break;
                    }
                    continue;
                }
                task = self.queue.take_due() => task.into_inner(),
            };

            match AssertUnwindSafe(self.process(&task)).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.report_failure(&task, &e),
                Err(panic) => {
                    let e = CommitError::Panicked(panic_message(&*panic));
                    self.report_failure(&task, &e);
                }
            }
        }
        info!(pending = self.queue.len(), "commit loop stopped");
    }

    /// One task: read back, compare, commit or discard.
    pub async fn process(&self, task: &CommitTask) -> Result<(), CommitError> {
        let cached = self.cache.read(task.lesson_id, task.section_id).await;

        let (record_id, moment) = match decide(task, cached.as_ref()) {
            Decision::Commit { record_id, moment } => (record_id, moment),
            Decision::Discard(reason) => {
                debug!(
                    lesson_id = %task.lesson_id,
                    section_id = %task.section_id,
                    moment = task.moment,
                    ?reason,
                    "discarding learning record commit"
                );
                self.counters.discarded(reason);
                return Ok(());
            }
        };

        // finished is never touched here: completion is decided by other logic
        self.store
            .update_record(RecordUpdate::moment_only(record_id, moment))
            .await?;
        self.store
            .update_lesson(LessonUpdate {
                id: task.lesson_id,
                latest_section_id: task.section_id,
                latest_learn_time: self.clock.now(),
            })
            .await?;

        self.counters.committed();
        info!(
            lesson_id = %task.lesson_id,
            section_id = %task.section_id,
            %record_id,
            moment,
            "committed learning record"
        );
        Ok(())
    }

    fn report_failure(&self, task: &CommitTask, e: &CommitError) {
        self.counters.failed();
        error!(
            lesson_id = %task.lesson_id,
            section_id = %task.section_id,
            moment = task.moment,
            revision = %task.revision,
            error = %e,
            "failed to process delayed learning record task"
        );
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
