//! Configuration for the auto-learn controller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoLearnConfig {
    /// Time between poll cycles in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Snapshot extraction attempts per tick.
    #[serde(default = "default_extract_attempts")]
    pub extract_attempts: u32,

    /// Delay between extraction attempts in milliseconds.
    #[serde(default = "default_extract_retry_delay_ms")]
    pub extract_retry_delay_ms: u64,

    /// Consecutive failed cycles before the loop pauses itself.
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,

    /// How long the self-healing pause lasts, in milliseconds.
    #[serde(default = "default_error_cooldown_ms")]
    pub error_cooldown_ms: u64,

    /// Playback rate requested when resuming videos.
    #[serde(default = "default_playback_rate")]
    pub playback_rate: f32,

    /// Snapshot cache freshness window in milliseconds.
    #[serde(default = "default_snapshot_ttl_ms")]
    pub snapshot_ttl_ms: u64,

    /// Startup behavior.
    #[serde(default)]
    pub startup: StartupConfig,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_extract_attempts() -> u32 {
    2
}

fn default_extract_retry_delay_ms() -> u64 {
    1000
}

fn default_max_consecutive_errors() -> u32 {
    3
}

fn default_error_cooldown_ms() -> u64 {
    5000
}

fn default_playback_rate() -> f32 {
    2.0
}

fn default_snapshot_ttl_ms() -> u64 {
    1500
}

impl Default for AutoLearnConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            extract_attempts: default_extract_attempts(),
            extract_retry_delay_ms: default_extract_retry_delay_ms(),
            max_consecutive_errors: default_max_consecutive_errors(),
            error_cooldown_ms: default_error_cooldown_ms(),
            playback_rate: default_playback_rate(),
            snapshot_ttl_ms: default_snapshot_ttl_ms(),
            startup: StartupConfig::default(),
        }
    }
}

impl AutoLearnConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn extract_retry_delay(&self) -> Duration {
        Duration::from_millis(self.extract_retry_delay_ms)
    }

    pub fn error_cooldown(&self) -> Duration {
        Duration::from_millis(self.error_cooldown_ms)
    }

    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_millis(self.snapshot_ttl_ms)
    }
}

/// Startup (initialize-from-storage) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupConfig {
    /// How long to wait for the page to yield a non-empty snapshot, in
    /// milliseconds.
    #[serde(default = "default_lesson_wait_timeout_ms")]
    pub lesson_wait_timeout_ms: u64,

    /// Poll spacing while waiting for lessons, in milliseconds.
    #[serde(default = "default_lesson_wait_poll_ms")]
    pub lesson_wait_poll_ms: u64,

    /// Initialization attempts before giving up.
    #[serde(default = "default_max_init_retries")]
    pub max_init_retries: u32,

    /// Delay between initialization attempts in milliseconds.
    #[serde(default = "default_init_retry_delay_ms")]
    pub init_retry_delay_ms: u64,
}

fn default_lesson_wait_timeout_ms() -> u64 {
    5000
}

fn default_lesson_wait_poll_ms() -> u64 {
    300
}

fn default_max_init_retries() -> u32 {
    5
}

fn default_init_retry_delay_ms() -> u64 {
    2000
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            lesson_wait_timeout_ms: default_lesson_wait_timeout_ms(),
            lesson_wait_poll_ms: default_lesson_wait_poll_ms(),
            max_init_retries: default_max_init_retries(),
            init_retry_delay_ms: default_init_retry_delay_ms(),
        }
    }
}

impl StartupConfig {
    pub fn lesson_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.lesson_wait_timeout_ms)
    }

    pub fn lesson_wait_poll(&self) -> Duration {
        Duration::from_millis(self.lesson_wait_poll_ms)
    }

    pub fn init_retry_delay(&self) -> Duration {
        Duration::from_millis(self.init_retry_delay_ms)
    }
}
