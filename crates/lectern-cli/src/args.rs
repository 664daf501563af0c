use std::time::Duration;

use clap::Parser;
use lectern_core::DebounceConfig;

/// Replay a burst of progress updates through a running debouncer and print
/// what reached the store.
#[derive(Parser, Debug, Clone)]
#[command(name = "lectern", version, about)]
pub struct Args {
    /// Seconds without a newer update before a record is committed
    #[arg(long, env = "LECTERN_QUIET_PERIOD_SECS", default_value_t = 20)]
    pub quiet_period_secs: u64,

    /// Fast cache TTL in seconds; must exceed the quiet period
    #[arg(long, env = "LECTERN_CACHE_TTL_SECS", default_value_t = 60)]
    pub cache_ttl_secs: u64,

    /// Commit updates that mark a section finished without waiting
    #[arg(long, env = "LECTERN_FLUSH_ON_FINISH", default_value_t = false)]
    pub flush_on_finish: bool,

    /// Redis URL for the fast cache; in-memory when unset
    #[arg(long, env = "LECTERN_REDIS_URL")]
    pub redis_url: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub lesson: u64,

    #[arg(long, default_value_t = 1)]
    pub section: u64,

    #[arg(long, default_value_t = 1)]
    pub record: u64,

    /// Playback positions to submit, in order
    #[arg(long, value_delimiter = ',', default_values_t = [10u32, 15, 15])]
    pub moments: Vec<u32>,

    /// Pause between submissions
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,

    /// Mark the last update as finishing the section
    #[arg(long, default_value_t = false)]
    pub finish: bool,

    /// Raw `user-info` header value attached to the submissions
    #[arg(long)]
    pub user_header: Option<String>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn debounce_config(&self) -> DebounceConfig {
        DebounceConfig::new(
            Duration::from_secs(self.quiet_period_secs),
            Duration::from_secs(self.cache_ttl_secs),
        )
        .with_flush_on_finish(self.flush_on_finish)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// How long to wait after the last submission for its commit.
    pub fn settle_time(&self) -> Duration {
        Duration::from_secs(self.quiet_period_secs + 1)
    }
}
