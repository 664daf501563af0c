//! DebounceConfig - 遅延書き戻しの設定
//!
//! `Default` は参照実装の挙動（静穏期間 20 秒、キャッシュ TTL 60 秒）。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ConfigError;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(20);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Delay between an update and its eligibility for commit.
    pub quiet_period: Duration,

    /// How long a cached snapshot survives without further writes.
    pub cache_ttl: Duration,

    /// Commit `finished == Some(true)` updates without waiting for the quiet period.
    pub flush_on_finish: bool,
}

impl DebounceConfig {
    pub fn new(quiet_period: Duration, cache_ttl: Duration) -> Self {
        Self {
            quiet_period,
            cache_ttl,
            flush_on_finish: false,
        }
    }

    pub fn with_flush_on_finish(mut self, enabled: bool) -> Self {
        self.flush_on_finish = enabled;
        self
    }

    /// The cache must outlive the quiet period, otherwise every due task
    /// finds its snapshot gone and nothing is ever committed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet_period.is_zero() {
            return Err(ConfigError::ZeroQuietPeriod);
        }
        if self.cache_ttl <= self.quiet_period {
            return Err(ConfigError::TtlTooShort {
                ttl: self.cache_ttl,
                quiet: self.quiet_period,
            });
        }
        Ok(())
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD, DEFAULT_CACHE_TTL)
    }
}
