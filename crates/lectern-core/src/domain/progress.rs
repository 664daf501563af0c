//! Progress - 再生進捗のスナップショットと遅延コミットタスク
//!
//! # データの流れ
//! 1. トランスポート層から `ProgressSnapshot` を受け取る
//! 2. Fast Cache に `CachedProgress` として上書き保存
//! 3. 同じ内容のコピー（`CommitTask`）を DelayQueue に積む
//! 4. 期限が来たら、キャッシュの最新値と `CommitTask` を比較する

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

use super::ids::{LessonId, RecordId, SectionId};

/// Coarse cache key prefix; the lesson id is appended.
pub const RECORD_KEY_PREFIX: &str = "learning:record:";

/// Coarse key of the cache hash holding every section of one lesson.
pub fn record_cache_key(lesson_id: LessonId) -> String {
    format!("{RECORD_KEY_PREFIX}{lesson_id}")
}

/// Field of a section inside the lesson hash.
pub fn record_cache_field(section_id: SectionId) -> String {
    section_id.to_string()
}

/// One incoming progress update, as handed over by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub record_id: RecordId,
    pub lesson_id: LessonId,
    pub section_id: SectionId,
    /// Playback position. Expected to grow, not enforced.
    pub moment: u32,
    /// `None` when the client did not say.
    pub finished: Option<bool>,
}

/// Per-submission token written next to the snapshot.
///
/// Two updates carrying the same `moment` still get distinct revisions, so only
/// the most recent of them is allowed to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(Ulid);

impl Revision {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rev-{}", self.0)
    }
}

/// Value stored in the Fast Cache field.
///
/// Serialized as compact JSON: `{"id":1,"moment":15,"finished":true,"rev":"01H.."}`.
/// `finished` and `rev` are left out when unset; a value without `rev` still decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedProgress {
    pub id: RecordId,
    pub moment: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<Revision>,
}

impl CachedProgress {
    pub fn from_snapshot(snapshot: &ProgressSnapshot, rev: Revision) -> Self {
        Self {
            id: snapshot.record_id,
            moment: snapshot.moment,
            finished: snapshot.finished,
            rev: Some(rev),
        }
    }
}

/// Copy of an update's identifying fields, taken at enqueue time.
///
/// Never mutated after creation; supersession is detected by comparing it
/// with whatever the cache holds when the task comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitTask {
    pub lesson_id: LessonId,
    pub section_id: SectionId,
    pub moment: u32,
    pub revision: Revision,
}

impl CommitTask {
    pub fn new(snapshot: &ProgressSnapshot, revision: Revision) -> Self {
        Self {
            lesson_id: snapshot.lesson_id,
            section_id: snapshot.section_id,
            moment: snapshot.moment,
            revision,
        }
    }

    /// Whether the cached value is still the one this task was created for.
    pub fn matches(&self, cached: &CachedProgress) -> bool {
        if cached.moment != self.moment {
            return false;
        }
        match cached.rev {
            Some(rev) => rev == self.revision,
            // written without a revision: the moment is all we can compare
            None => true,
        }
    }
}
