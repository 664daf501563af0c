//! Errors - エラー型と分類
//!
//! - `CacheError`: Fast Cache の障害（`ProgressCache` が握りつぶしてログに残す）
//! - `StoreError`: Persistent Store の障害（コミットループがログに残してタスクを捨てる）
//! - `ConfigError`: 起動時の設定検証エラー（Fail-fast）
//! - `LifecycleError`: ワーカーの起動・停止失敗（唯一の致命的エラー）
//! - `CommitError`: 1 イテレーション分の失敗（ループは継続）

use std::time::Duration;

use thiserror::Error;

use super::ids::{LessonId, RecordId};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("cache backend error: {0}")]
    Backend(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_refusal() || err.is_timeout() {
            CacheError::Unavailable(err.to_string())
        } else {
            CacheError::Backend(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("learning record not found: id={0}")]
    RecordNotFound(RecordId),

    #[error("lesson not found: id={0}")]
    LessonNotFound(LessonId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("quiet period must be greater than zero")]
    ZeroQuietPeriod,

    #[error("cache ttl ({ttl:?}) must be longer than the quiet period ({quiet:?})")]
    TtlTooShort { ttl: Duration, quiet: Duration },
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("no tokio runtime available to spawn the commit loop")]
    NoRuntime,

    #[error("commit loop terminated abnormally: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("commit panicked: {0}")]
    Panicked(String),
}
