//! Configuration types shared across crates.

use crate::hash::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inter-attempt backoff function applied by retry loops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryBackoff {
    /// The same delay between every attempt.
    #[default]
    Fixed,
    /// `delay × attempt_number` between attempts.
    Linear,
}

/// A bounded retry policy: `max_retries + 1` total attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 means a single attempt).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base inter-attempt delay in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Backoff function.
    #[serde(default)]
    pub backoff: RetryBackoff,
}

impl RetryPolicy {
    /// Total attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = Duration::from_millis(self.retry_delay_ms);
        match self.backoff {
            RetryBackoff::Fixed => base,
            RetryBackoff::Linear => base.saturating_mul(attempt),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            backoff: RetryBackoff::default(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

/// Pinning coordinator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PinningConfig {
    /// Retry policy for pin execution (fixed backoff by default).
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Whether backup fan-out is enabled at all.
    #[serde(default = "default_true")]
    pub backup_enabled: bool,
    /// Pin critical content immediately under the conditional strategy.
    #[serde(default = "default_true")]
    pub auto_pin_critical: bool,
    /// Background queue poll interval in milliseconds.
    #[serde(default = "default_pinning_delay_ms")]
    pub pinning_delay_ms: u64,
    /// Size threshold in bytes below which conditional pins run immediately.
    #[serde(default = "default_conditional_size_threshold")]
    pub conditional_size_threshold: u64,
}

fn default_true() -> bool {
    true
}

fn default_pinning_delay_ms() -> u64 {
    5000
}

fn default_conditional_size_threshold() -> u64 {
    1024 * 1024 // 1 MiB
}

impl Default for PinningConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            backup_enabled: default_true(),
            auto_pin_critical: default_true(),
            pinning_delay_ms: default_pinning_delay_ms(),
            conditional_size_threshold: default_conditional_size_threshold(),
        }
    }
}

impl PinningConfig {
    /// Get the queue poll interval as a Duration.
    pub fn pinning_delay(&self) -> Duration {
        Duration::from_millis(self.pinning_delay_ms)
    }

    /// Validate pinning configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.pinning_delay_ms == 0 {
            return Err(
                "pinning.pinning_delay_ms cannot be 0 (would spin the queue processor)"
                    .to_string(),
            );
        }
        Ok(())
    }
}

/// Name service configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NameConfig {
    /// Cache freshness window and auto-refresh sweep interval, milliseconds.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Re-resolve published names on a background schedule.
    #[serde(default = "default_true")]
    pub auto_refresh: bool,
    /// Default publish lifetime in seconds.
    #[serde(default = "default_lifetime_secs")]
    pub default_lifetime_secs: u64,
    /// Default record TTL hint in seconds.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
}

fn default_refresh_interval_ms() -> u64 {
    60_000
}

fn default_lifetime_secs() -> u64 {
    86400 // 24 hours
}

fn default_ttl_secs() -> u64 {
    300
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            auto_refresh: default_true(),
            default_lifetime_secs: default_lifetime_secs(),
            default_ttl_secs: default_ttl_secs(),
        }
    }
}

impl NameConfig {
    /// Get the refresh interval as a Duration.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Cache entries older than this are evictable (2x the refresh interval).
    pub fn eviction_age(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.saturating_mul(2))
    }

    /// Validate name configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.refresh_interval_ms == 0 {
            return Err(
                "names.refresh_interval_ms cannot be 0 (every read would miss the cache)"
                    .to_string(),
            );
        }
        Ok(())
    }
}

/// Verification engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Per-fetch timeout in milliseconds.
    #[serde(default = "default_verification_timeout_ms")]
    pub timeout_ms: u64,
    /// Retry policy for remote verification (linear backoff by default).
    #[serde(default = "default_verification_retry")]
    pub retry: RetryPolicy,
    /// Digest algorithm used when the caller does not specify one.
    #[serde(default)]
    pub default_algorithm: HashAlgorithm,
    /// Maximum simultaneous verifications in a batch window.
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

fn default_verification_timeout_ms() -> u64 {
    30_000
}

fn default_verification_retry() -> RetryPolicy {
    RetryPolicy {
        backoff: RetryBackoff::Linear,
        ..RetryPolicy::default()
    }
}

fn default_batch_concurrency() -> usize {
    4
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_verification_timeout_ms(),
            retry: default_verification_retry(),
            default_algorithm: HashAlgorithm::default(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

impl VerificationConfig {
    /// Get the fetch timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate verification configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_concurrency == 0 {
            return Err(
                "verification.batch_concurrency must be at least 1".to_string(),
            );
        }
        if self.timeout_ms == 0 {
            return Err("verification.timeout_ms cannot be 0".to_string());
        }
        Ok(())
    }
}

/// Complete configuration for the reliability layer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pinning coordinator configuration.
    #[serde(default)]
    pub pinning: PinningConfig,
    /// Name service configuration.
    #[serde(default)]
    pub names: NameConfig,
    /// Verification engine configuration.
    #[serde(default)]
    pub verification: VerificationConfig,
}

impl AppConfig {
    /// Validate all component configurations.
    pub fn validate(&self) -> Result<(), String> {
        self.pinning.validate()?;
        self.names.validate()?;
        self.verification.validate()?;
        Ok(())
    }

    /// Create a test configuration with short intervals.
    ///
    /// **For testing only.** Keeps retries cheap and background ticks fast
    /// so tests run in milliseconds.
    pub fn for_testing() -> Self {
        Self {
            pinning: PinningConfig {
                retry: RetryPolicy {
                    max_retries: 2,
                    retry_delay_ms: 10,
                    backoff: RetryBackoff::Fixed,
                },
                pinning_delay_ms: 20,
                ..PinningConfig::default()
            },
            names: NameConfig {
                refresh_interval_ms: 200,
                ..NameConfig::default()
            },
            verification: VerificationConfig {
                timeout_ms: 1000,
                retry: RetryPolicy {
                    max_retries: 2,
                    retry_delay_ms: 10,
                    backoff: RetryBackoff::Linear,
                },
                ..VerificationConfig::default()
            },
        }
    }
}
