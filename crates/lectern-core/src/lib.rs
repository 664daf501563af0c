//! lectern-core
//!
//! Delayed, debounced write-back of learning progress.
//!
//! 進捗更新はまず Fast Cache に書き、静穏期間（既定 20 秒）後に
//! 「まだ最新か」を確認してから永続ストアへ書き戻します。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, progress, decision, records, errors）
//! - **ports**: 抽象化レイヤー（Clock, RevisionGenerator, HashCache, LearningStore）
//! - **queue**: 期限順の遅延キュー（Delayed, DelayQueue）
//! - **app**: アプリケーションロジック（builder, ingress, commit_loop, progress_cache）
//! - **impls**: 実装（InMemory / Redis）
//! - **identity**: `user-info` ヘッダーとタスクローカルなユーザーコンテキスト
//! - **observability**: カウンタのスナップショット

pub mod app;
pub mod domain;
pub mod identity;
pub mod impls;
pub mod observability;
pub mod ports;
pub mod queue;

pub use app::{DebounceConfig, Debouncer, DebouncerBuilder, DebouncerHandle, ProgressIngress};
pub use observability::DebounceCounts;
