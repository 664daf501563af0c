//! Decision model: what to do with a commit task that has come due.
//!
//! The decision is a pure function of the task and the cache's current value.
//! Executing it (store writes, logging, counters) is the commit loop's job.

use super::ids::RecordId;
use super::progress::{CachedProgress, CommitTask};

/// Why a due task was dropped without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Cache entry expired or was cleaned.
    Missing,

    /// A newer update owns the commit.
    Superseded,
}

/// The next action for a due task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Persist `moment` to the record. `finished` is deliberately absent.
    Commit { record_id: RecordId, moment: u32 },

    Discard(DiscardReason),
}

/// Decide the fate of a due task.
///
/// # Arguments
/// * `task` - The task taken from the queue.
/// * `cached` - What the Fast Cache holds right now for the task's key.
pub fn decide(task: &CommitTask, cached: Option<&CachedProgress>) -> Decision {
    let Some(cached) = cached else {
        return Decision::Discard(DiscardReason::Missing);
    };

    if !task.matches(cached) {
        return Decision::Discard(DiscardReason::Superseded);
    }

    Decision::Commit {
        record_id: cached.id,
        moment: task.moment,
    }
}
