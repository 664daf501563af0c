//! RevisionGenerator port - 更新ごとのリビジョン生成
//!
//! 同じ `moment` が連続で送られてきても、最後の 1 件だけがコミットできるように、
//! 更新ごとに一意なトークンを発行します。
//!
//! # 実装
//! - **UlidRevisions**: ULID ベース（本番用）

use crate::domain::progress::Revision;
use crate::ports::Clock;
use ulid::Ulid;

/// RevisionGenerator は更新ごとのリビジョンを生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（Ingress は並行に呼ばれる）
pub trait RevisionGenerator: Send + Sync {
    fn next_revision(&self) -> Revision;
}

/// UlidRevisions は ULID ベースのリビジョン生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// これにより、テスト時に FixedClock を使って時刻部分を固定できます。
pub struct UlidRevisions<C> {
    clock: C,
}

impl<C: Clock> UlidRevisions<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> RevisionGenerator for UlidRevisions<C> {
    fn next_revision(&self) -> Revision {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        Revision::from_ulid(ulid)
    }
}
