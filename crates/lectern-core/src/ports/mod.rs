//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（Redis, リレーショナル DB）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - 永続ストアが正本（source of truth）
//! - Fast Cache は「最新の進捗」を安く判定するための最適化にすぎない

pub mod clock;
pub mod hash_cache;
pub mod learning_store;
pub mod revision;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::hash_cache::HashCache;
pub use self::learning_store::LearningStore;
pub use self::revision::{RevisionGenerator, UlidRevisions};
