//! LearningStore port - 学習記録と課表の正本（source of truth）
//!
//! コミットループは「id 指定の更新」しか行いません。
//! 学習記録の作成は別のロジック（外部のコラボレーター）の責務です。

use async_trait::async_trait;

use crate::domain::{LessonUpdate, RecordUpdate, StoreError};

/// LearningStore は永続ストア
///
/// # 設計原則
/// - 存在しない id の更新は `StoreError::*NotFound`
/// - `RecordUpdate::finished == None` のときは finished 列に触れない
#[async_trait]
pub trait LearningStore: Send + Sync {
    async fn update_record(&self, update: RecordUpdate) -> Result<(), StoreError>;

    async fn update_lesson(&self, update: LessonUpdate) -> Result<(), StoreError>;
}
