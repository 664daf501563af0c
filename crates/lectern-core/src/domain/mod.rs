//! Domain model (IDs, progress snapshots, commit tasks, decisions, records, errors).

pub mod decision;
pub mod errors;
pub mod ids;
pub mod progress;
pub mod records;

pub use self::decision::{Decision, DiscardReason, decide};
pub use self::errors::{CacheError, CommitError, ConfigError, LifecycleError, StoreError};
pub use self::ids::{Id, IdMarker, LessonId, RecordId, SectionId, UserId};
pub use self::progress::{
    CachedProgress, CommitTask, ProgressSnapshot, RECORD_KEY_PREFIX, Revision, record_cache_field,
    record_cache_key,
};
pub use self::records::{LearningRecord, LessonSummary, LessonUpdate, RecordUpdate};
