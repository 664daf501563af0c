//! End-to-end debounce scenarios on virtual time.
//!
//! Every test runs with a paused tokio clock, so a 20 second quiet period
//! elapses instantly while keeping the exact ordering of deadlines.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use super::builder::{DebouncerBuilder, DebouncerHandle};
use super::config::DebounceConfig;
use super::ingress::ProgressIngress;
use super::testing::{Fault, FaultyStore, FlakyCache};
use crate::domain::{LearningRecord, LessonId, ProgressSnapshot, RecordId, SectionId};
use crate::impls::InMemoryLearningStore;
use crate::ports::HashCache;

struct Harness {
    handle: DebouncerHandle,
    ingress: ProgressIngress,
    store: Arc<FaultyStore>,
    flaky: Arc<FlakyCache>,
}

/// Lesson 1 with sections 1..=5; record id = 100 + section.
fn harness(config: DebounceConfig) -> Harness {
    let inner = InMemoryLearningStore::new();
    for section in 1..=5 {
        inner.insert_record(LearningRecord {
            id: RecordId::new(100 + section),
            lesson_id: LessonId::new(1),
            section_id: SectionId::new(section),
            moment: 0,
            finished: section % 2 == 0,
        });
    }
    let store = Arc::new(FaultyStore::new(inner));
    let flaky = Arc::new(FlakyCache::new());

    let handle = DebouncerBuilder::new(flaky.clone(), store.clone())
        .config(config)
        .build()
        .unwrap()
        .start()
        .unwrap();
    let ingress = handle.ingress();

    Harness {
        handle,
        ingress,
        store,
        flaky,
    }
}

fn update(section: u64, moment: u32, finished: Option<bool>) -> ProgressSnapshot {
    ProgressSnapshot {
        record_id: RecordId::new(100 + section),
        lesson_id: LessonId::new(1),
        section_id: SectionId::new(section),
        moment,
        finished,
    }
}

fn committed_moments(h: &Harness, section: u64) -> Vec<u32> {
    h.store
        .inner
        .record_updates()
        .into_iter()
        .filter(|u| u.id == RecordId::new(100 + section))
        .map(|u| u.moment)
        .collect()
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[tokio::test(start_paused = true)]
async fn single_update_commits_after_quiet_period() {
    let h = harness(DebounceConfig::default());
    h.ingress.submit(update(1, 137, None)).await;

    sleep(secs(19)).await;
    assert!(committed_moments(&h, 1).is_empty());

    sleep(secs(2)).await;
    assert_eq!(committed_moments(&h, 1), vec![137]);
    assert_eq!(h.store.inner.record(RecordId::new(101)).unwrap().moment, 137);

    let lesson = h.store.inner.lesson(LessonId::new(1)).unwrap();
    assert_eq!(lesson.latest_section_id, Some(SectionId::new(1)));
    assert!(lesson.latest_learn_time.is_some());

    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn burst_commits_once_with_last_moment() {
    let h = harness(DebounceConfig::default());
    for moment in 10..=20 {
        h.ingress.submit(update(1, moment, None)).await;
        sleep(secs(1)).await;
    }

    sleep(secs(40)).await;
    assert_eq!(committed_moments(&h, 1), vec![20]);

    let counts = h.handle.counts();
    assert_eq!(counts.submitted, 11);
    assert_eq!(counts.committed, 1);
    assert_eq!(counts.superseded, 10);
    assert_eq!(counts.pending, 0);

    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn repeated_moment_commits_once_after_last_update() {
    let h = harness(DebounceConfig::default());

    // t=0: 10, t=2: 15, t=5: 15 again
    h.ingress.submit(update(1, 10, None)).await;
    sleep(secs(2)).await;
    h.ingress.submit(update(1, 15, None)).await;
    sleep(secs(3)).await;
    h.ingress.submit(update(1, 15, None)).await;

    // t=24: the t=0 and t=2 tasks have fired and been superseded
    sleep(secs(19)).await;
    assert!(committed_moments(&h, 1).is_empty());
    assert_eq!(h.handle.counts().superseded, 2);

    // t=26: the t=5 task fired at t=25
    sleep(secs(2)).await;
    assert_eq!(committed_moments(&h, 1), vec![15]);

    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn updates_further_apart_than_quiet_period_commit_twice() {
    let h = harness(DebounceConfig::default());

    h.ingress.submit(update(1, 10, None)).await;
    sleep(secs(21)).await;
    h.ingress.submit(update(1, 30, None)).await;
    sleep(secs(21)).await;

    assert_eq!(committed_moments(&h, 1), vec![10, 30]);
    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn commit_never_alters_finished() {
    let h = harness(DebounceConfig::default());

    // section 2 is stored finished, section 3 is not; the updates claim the opposite
    h.ingress.submit(update(2, 50, Some(false))).await;
    h.ingress.submit(update(3, 60, Some(true))).await;
    sleep(secs(21)).await;

    let finished = h.store.inner.record(RecordId::new(102)).unwrap();
    assert_eq!(finished.moment, 50);
    assert!(finished.finished);

    let unfinished = h.store.inner.record(RecordId::new(103)).unwrap();
    assert_eq!(unfinished.moment, 60);
    assert!(!unfinished.finished);

    assert!(h
        .store
        .inner
        .record_updates()
        .iter()
        .all(|u| u.finished.is_none()));

    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn keys_are_debounced_independently() {
    let h = harness(DebounceConfig::default());

    for step in 0..5 {
        h.ingress.submit(update(1, 100 + step, None)).await;
        h.ingress.submit(update(2, 200 + step, None)).await;
        sleep(secs(1)).await;
    }
    sleep(secs(30)).await;

    assert_eq!(committed_moments(&h, 1), vec![104]);
    assert_eq!(committed_moments(&h, 2), vec![204]);
    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn concurrent_producers_settle_per_key() {
    let h = harness(DebounceConfig::default());

    let producers: Vec<_> = (1..=5)
        .map(|section| {
            let ingress = h.ingress.clone();
            tokio::spawn(async move {
                for moment in 0..10 {
                    ingress.submit(update(section, moment, None)).await;
                    sleep(Duration::from_millis(300)).await;
                }
            })
        })
        .collect();
    for producer in producers {
        producer.await.unwrap();
    }
    sleep(secs(30)).await;

    for section in 1..=5 {
        assert_eq!(committed_moments(&h, section), vec![9]);
    }
    assert_eq!(h.handle.counts().committed, 5);
    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn stop_is_prompt_and_final() {
    let h = harness(DebounceConfig::default());
    h.ingress.submit(update(1, 10, None)).await;
    sleep(secs(1)).await;

    let ingress = h.ingress.clone();
    let store = Arc::clone(&h.store);
    tokio::time::timeout(secs(1), h.handle.stop())
        .await
        .expect("stop must not wait for the quiet period")
        .unwrap();

    // submitting after stop only refreshes the cache
    assert!(ingress.is_closed());
    ingress.submit(update(1, 11, None)).await;
    assert!(h.flaky.get_field("learning:record:1", "1").await.unwrap().is_some());

    sleep(secs(60)).await;
    assert!(store.inner.record_updates().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cache_read_outage_discards_and_loop_continues() {
    let h = harness(DebounceConfig::default());

    h.ingress.submit(update(1, 10, None)).await;
    sleep(secs(1)).await;
    h.ingress.submit(update(2, 20, None)).await;

    h.flaky.fail_next_reads(1);
    sleep(secs(25)).await;

    assert!(committed_moments(&h, 1).is_empty());
    assert_eq!(committed_moments(&h, 2), vec![20]);
    assert_eq!(h.handle.counts().missing, 1);
    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn cache_write_outage_leaves_nothing_to_commit() {
    let h = harness(DebounceConfig::default());

    h.flaky.fail_all(true);
    h.ingress.submit(update(1, 10, None)).await;
    h.flaky.fail_all(false);

    sleep(secs(21)).await;
    assert!(committed_moments(&h, 1).is_empty());
    assert_eq!(h.handle.counts().missing, 1);
    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn store_failure_drops_task_without_retry() {
    let h = harness(DebounceConfig::default());
    h.store.inject(&[Fault::Fail]);

    h.ingress.submit(update(1, 10, None)).await;
    sleep(secs(21)).await;
    assert_eq!(h.store.inner.record(RecordId::new(101)).unwrap().moment, 0);
    assert_eq!(h.handle.counts().failed, 1);

    // the next update to the key tries again through its own task
    h.ingress.submit(update(1, 11, None)).await;
    sleep(secs(21)).await;
    assert_eq!(h.store.inner.record(RecordId::new(101)).unwrap().moment, 11);

    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn panicking_store_does_not_kill_the_loop() {
    let h = harness(DebounceConfig::default());
    h.store.inject(&[Fault::Panic]);

    h.ingress.submit(update(1, 10, None)).await;
    sleep(secs(1)).await;
    h.ingress.submit(update(2, 20, None)).await;
    sleep(secs(21)).await;

    assert_eq!(h.handle.counts().failed, 1);
    assert!(committed_moments(&h, 1).is_empty());
    assert_eq!(committed_moments(&h, 2), vec![20]);
    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn finished_update_flushes_immediately_when_enabled() {
    let h = harness(DebounceConfig::default().with_flush_on_finish(true));

    h.ingress.submit(update(3, 300, Some(true))).await;
    sleep(Duration::from_millis(10)).await;

    assert_eq!(committed_moments(&h, 3), vec![300]);
    // completion state still belongs to other logic
    assert!(!h.store.inner.record(RecordId::new(103)).unwrap().finished);
    h.handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn updates_submitted_before_start_are_drained() {
    let store = Arc::new(InMemoryLearningStore::new());
    store.insert_record(LearningRecord {
        id: RecordId::new(101),
        lesson_id: LessonId::new(1),
        section_id: SectionId::new(1),
        moment: 0,
        finished: false,
    });
    let debouncer = DebouncerBuilder::new(Arc::new(FlakyCache::new()), store.clone())
        .build()
        .unwrap();

    debouncer.ingress().submit(update(1, 42, None)).await;
    let handle = debouncer.start().unwrap();
    sleep(secs(21)).await;

    assert_eq!(store.record(RecordId::new(101)).unwrap().moment, 42);
    handle.stop().await.unwrap();
}
