//! HashCache port - Fast Cache（Redis または InMemory）
//!
//! キー → フィールド → 文字列値 の 2 階層ストアです。TTL はキー単位。
//!
//! # 実装
//! - `InMemoryHashCache`: 開発・テスト用
//! - `RedisHashCache`: 本番用（HSET / HGET / HDEL / EXPIRE）

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::CacheError;

/// HashCache は Fast Cache の生のバックエンド
///
/// # 設計原則
/// - 値は文字列（シリアライズは上位の `ProgressCache` の責務）
/// - エラーはそのまま返す（握りつぶすのも上位の責務）
/// - 書き込みのたびにキーの TTL を更新する
#[async_trait]
pub trait HashCache: Send + Sync {
    /// Set `field` under `key` and refresh the key's TTL.
    async fn put_field(
        &self,
        key: &str,
        field: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, CacheError>;

    async fn delete_field(&self, key: &str, field: &str) -> Result<(), CacheError>;
}
