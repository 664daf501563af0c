//! RedisHashCache - 本番用の Fast Cache
//!
//! `ConnectionManager` は切断時に自動再接続し、clone しても同じ接続を共有します。
//! 書き込みは HSET + EXPIRE を 1 つの MULTI パイプラインで送ります。

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::domain::CacheError;
use crate::ports::HashCache;

#[derive(Clone)]
pub struct RedisHashCache {
    conn: ConnectionManager,
}

impl RedisHashCache {
    /// Connect to `redis://host:port[/db]`.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

/// `MULTI; HSET key field value; EXPIRE key ttl; EXEC`
fn put_pipeline(key: &str, field: &str, value: String, ttl: Duration) -> redis::Pipeline {
    // EXPIRE takes whole seconds; never send 0, which would delete the key
    let seconds = i64::try_from(ttl.as_secs().max(1)).unwrap_or(i64::MAX);
    let mut pipe = redis::pipe();
    pipe.atomic()
        .hset(key, field, value)
        .ignore()
        .expire(key, seconds)
        .ignore();
    pipe
}

#[async_trait]
impl HashCache for RedisHashCache {
    async fn put_field(
        &self,
        key: &str,
        field: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = put_pipeline(key, field, value, ttl)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(key, field).await?;
        Ok(value)
    }

    async fn delete_field(&self, key: &str, field: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn.hdel(key, field).await?;
        Ok(())
    }
}
