//! Persisted learning state and the update commands the commit loop issues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{LessonId, RecordId, SectionId};

/// Durable progress entry for one (lesson, section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningRecord {
    pub id: RecordId,
    pub lesson_id: LessonId,
    pub section_id: SectionId,
    pub moment: u32,
    pub finished: bool,
}

/// Durable per-lesson summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSummary {
    pub id: LessonId,
    pub latest_section_id: Option<SectionId>,
    pub latest_learn_time: Option<DateTime<Utc>>,
}

impl LessonSummary {
    pub fn new(id: LessonId) -> Self {
        Self {
            id,
            latest_section_id: None,
            latest_learn_time: None,
        }
    }
}

/// Update-by-id for a learning record.
///
/// `finished: None` leaves the stored flag untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub id: RecordId,
    pub moment: u32,
    pub finished: Option<bool>,
}

impl RecordUpdate {
    /// The only shape the debounce path produces: completion state is decided elsewhere.
    pub fn moment_only(id: RecordId, moment: u32) -> Self {
        Self {
            id,
            moment,
            finished: None,
        }
    }

    pub fn apply_to(&self, record: &mut LearningRecord) {
        record.moment = self.moment;
        if let Some(finished) = self.finished {
            record.finished = finished;
        }
    }
}

/// Update-by-id for a lesson summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonUpdate {
    pub id: LessonId,
    pub latest_section_id: SectionId,
    pub latest_learn_time: DateTime<Utc>,
}

impl LessonUpdate {
    pub fn apply_to(&self, lesson: &mut LessonSummary) {
        lesson.latest_section_id = Some(self.latest_section_id);
        lesson.latest_learn_time = Some(self.latest_learn_time);
    }
}
