mod args;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::time::sleep;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectern_core::domain::{LearningRecord, LessonId, ProgressSnapshot, RecordId, SectionId};
use lectern_core::identity::{RequestIdentity, current_user};
use lectern_core::impls::{InMemoryHashCache, InMemoryLearningStore, RedisHashCache};
use lectern_core::ports::HashCache;
use lectern_core::{DebouncerBuilder, ProgressIngress};

use crate::args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("lectern={0},lectern_core={0},info", args.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let lesson_id = LessonId::new(args.lesson);
    let section_id = SectionId::new(args.section);
    let record_id = RecordId::new(args.record);

    // (A) store seeded with the record being played
    let store = Arc::new(InMemoryLearningStore::new());
    store.insert_record(LearningRecord {
        id: record_id,
        lesson_id,
        section_id,
        moment: 0,
        finished: false,
    });

    // (B) fast cache
    let cache: Arc<dyn HashCache> = match &args.redis_url {
        Some(url) => Arc::new(
            RedisHashCache::connect(url)
                .await
                .with_context(|| format!("connecting to redis at {url}"))?,
        ),
        None => Arc::new(InMemoryHashCache::new()),
    };

    // (C) build and start
    let handle = DebouncerBuilder::new(cache, store.clone())
        .config(args.debounce_config())
        .build()
        .context("invalid debounce configuration")?
        .start()?;
    info!(
        quiet_period_secs = args.quiet_period_secs,
        cache_ttl_secs = args.cache_ttl_secs,
        flush_on_finish = args.flush_on_finish,
        redis = args.redis_url.is_some(),
        "debouncer started"
    );

    // (D) replay the updates as the identified user
    let identity = RequestIdentity::from_header(args.user_header.as_deref());
    identity
        .scope(replay(&args, handle.ingress(), lesson_id, section_id, record_id))
        .await;

    // (E) wait for the last quiet period, or stop early on Ctrl-C
    tokio::select! {
        _ = sleep(args.settle_time()) => {}
        _ = tokio::signal::ctrl_c() => warn!("interrupted; pending updates are dropped"),
    }

    let report = serde_json::json!({
        "record": store.record(record_id),
        "lesson": store.lesson(lesson_id),
        "counts": handle.counts(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    handle.stop().await?;
    Ok(())
}

async fn replay(
    args: &Args,
    ingress: ProgressIngress,
    lesson_id: LessonId,
    section_id: SectionId,
    record_id: RecordId,
) {
    let last = args.moments.len().saturating_sub(1);
    for (i, &moment) in args.moments.iter().enumerate() {
        let finished = (args.finish && i == last).then_some(true);
        let rev = ingress
            .submit(ProgressSnapshot {
                record_id,
                lesson_id,
                section_id,
                moment,
                finished,
            })
            .await;
        info!(user = ?current_user(), moment, %rev, "submitted progress");

        if i != last {
            sleep(args.interval()).await;
        }
    }
}
