//! ProgressCache - Fast Cache アダプタ
//!
//! # データ構造
//! Hash 構造:
//! - key: `learning:record:{lessonId}`
//! - field: `{sectionId}`
//! - value: `CachedProgress` の JSON
//!
//! 課表（lesson）単位でまとめることで、同じ課表の小節がひとつのキーに集まり、
//! TTL もキー単位でまとめて延長されます。
//!
//! # ベストエフォート
//! キャッシュは最適化にすぎないので、どんな失敗（接続断・壊れた JSON）も
//! ログに残して「無い」扱い / no-op にします。呼び出し側にエラーは返しません。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::domain::{
    CachedProgress, LessonId, ProgressSnapshot, Revision, SectionId, record_cache_field,
    record_cache_key,
};
use crate::ports::HashCache;

#[derive(Clone)]
pub struct ProgressCache {
    backend: Arc<dyn HashCache>,
    ttl: Duration,
}

impl ProgressCache {
    pub fn new(backend: Arc<dyn HashCache>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Overwrite the snapshot for (lesson, section) and refresh the lesson key's TTL.
    pub async fn write(&self, snapshot: &ProgressSnapshot, rev: Revision) {
        let value = match serde_json::to_string(&CachedProgress::from_snapshot(snapshot, rev)) {
            Ok(value) => value,
            Err(e) => {
                error!(error = %e, "failed to encode learning record cache value");
                return;
            }
        };
        let key = record_cache_key(snapshot.lesson_id);
        let field = record_cache_field(snapshot.section_id);

        debug!(%key, %field, moment = snapshot.moment, %rev, "updating learning record cache");
        if let Err(e) = self.backend.put_field(&key, &field, value, self.ttl).await {
            error!(%key, %field, error = %e, "failed to write learning record cache");
        }
    }

    /// Current snapshot, or `None` when absent, expired, unreadable or undecodable.
    pub async fn read(&self, lesson_id: LessonId, section_id: SectionId) -> Option<CachedProgress> {
        let key = record_cache_key(lesson_id);
        let field = record_cache_field(section_id);

        let raw = match self.backend.get_field(&key, &field).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!(%key, %field, error = %e, "failed to read learning record cache");
                return None;
            }
        };

        match serde_json::from_str::<CachedProgress>(&raw) {
            Ok(cached) => Some(cached),
            Err(e) => {
                warn!(%key, %field, error = %e, "discarding undecodable learning record cache value");
                None
            }
        }
    }

    /// Remove one section's snapshot.
    pub async fn delete(&self, lesson_id: LessonId, section_id: SectionId) {
        let key = record_cache_key(lesson_id);
        let field = record_cache_field(section_id);
        if let Err(e) = self.backend.delete_field(&key, &field).await {
            error!(%key, %field, error = %e, "failed to delete learning record cache");
        }
    }
}
