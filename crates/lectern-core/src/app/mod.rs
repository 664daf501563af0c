//! App - アプリケーション層
//!
//! ports を組み合わせて遅延書き戻し（debounce）を実装します。
//!
//! # 主要コンポーネント
//! - **DebouncerBuilder**: 構築とワイヤリング、起動前の設定検証
//! - **ProgressIngress**: 進捗更新の受け口（キャッシュ書き込み + 遅延タスク投入）
//! - **CommitLoop**: 期限の来たタスクを比較してコミット
//! - **ProgressCache**: HashCache の上に載せたベストエフォートのキャッシュ

pub mod builder;
pub mod commit_loop;
pub mod config;
pub mod ingress;
pub mod progress_cache;

#[cfg(test)]
mod scenarios;
#[cfg(test)]
pub(crate) mod testing;

pub use self::builder::{Debouncer, DebouncerBuilder, DebouncerHandle};
pub use self::commit_loop::CommitLoop;
pub use self::config::{DEFAULT_CACHE_TTL, DEFAULT_QUIET_PERIOD, DebounceConfig};
pub use self::ingress::ProgressIngress;
pub use self::progress_cache::ProgressCache;
