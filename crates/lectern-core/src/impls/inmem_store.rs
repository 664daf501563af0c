//! InMemoryLearningStore - 開発用の永続ストア
//!
//! 本番ではリレーショナル DB が担う部分です。
//! テストでは spy としても使います（受け取った更新をすべて記録する）。

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{
    LearningRecord, LessonId, LessonSummary, LessonUpdate, RecordId, RecordUpdate, StoreError,
};
use crate::ports::LearningStore;

#[derive(Default)]
struct StoreState {
    records: HashMap<RecordId, LearningRecord>,
    lessons: HashMap<LessonId, LessonSummary>,
    /// Every update received, in order (including failed ones).
    record_updates: Vec<RecordUpdate>,
    lesson_updates: Vec<LessonUpdate>,
}

#[derive(Default)]
pub struct InMemoryLearningStore {
    state: Mutex<StoreState>,
}

impl InMemoryLearningStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record. Creation belongs to whoever owns the records table.
    pub fn insert_record(&self, record: LearningRecord) {
        let mut state = self.state.lock();
        state
            .lessons
            .entry(record.lesson_id)
            .or_insert_with(|| LessonSummary::new(record.lesson_id));
        state.records.insert(record.id, record);
    }

    pub fn record(&self, id: RecordId) -> Option<LearningRecord> {
        self.state.lock().records.get(&id).cloned()
    }

    pub fn lesson(&self, id: LessonId) -> Option<LessonSummary> {
        self.state.lock().lessons.get(&id).cloned()
    }

    pub fn record_updates(&self) -> Vec<RecordUpdate> {
        self.state.lock().record_updates.clone()
    }

    pub fn lesson_updates(&self) -> Vec<LessonUpdate> {
        self.state.lock().lesson_updates.clone()
    }
}

#[async_trait]
impl LearningStore for InMemoryLearningStore {
    async fn update_record(&self, update: RecordUpdate) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.record_updates.push(update.clone());
        let record = state
            .records
            .get_mut(&update.id)
            .ok_or(StoreError::RecordNotFound(update.id))?;
        update.apply_to(record);
        Ok(())
    }

    async fn update_lesson(&self, update: LessonUpdate) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state.lesson_updates.push(update.clone());
        let lesson = state
            .lessons
            .get_mut(&update.id)
            .ok_or(StoreError::LessonNotFound(update.id))?;
        update.apply_to(lesson);
        Ok(())
    }
}
