//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryHashCache**: 開発・テスト用の Fast Cache
//! - **RedisHashCache**: 本番用の Fast Cache
//! - **InMemoryLearningStore**: 開発・テスト用の永続ストア（spy としても使う）

pub mod inmem_cache;
pub mod inmem_store;
pub mod redis_cache;

// 主要な型を再エクスポート
pub use self::inmem_cache::InMemoryHashCache;
pub use self::inmem_store::InMemoryLearningStore;
pub use self::redis_cache::RedisHashCache;
