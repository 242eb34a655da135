//! Configuration types for the LiqLease engine planes.

use serde::{Deserialize, Serialize};

use crate::{ChainId, constants};

/// Configuration for the demand engine (ingress plane).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Duration filled in when the inbound demand API supplies only
    /// `{ token, amount }`.
    pub default_duration_secs: u64,
    /// APR ceiling filled in when the inbound demand API supplies none.
    pub default_max_apr_bps: u32,
    /// Upper bound on the number of offers one demand may draw upon.
    pub max_draws_per_demand: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: constants::DEFAULT_DURATION_SECS,
            default_max_apr_bps: constants::DEFAULT_MAX_APR_BPS,
            max_draws_per_demand: constants::DEFAULT_MAX_DRAWS_PER_DEMAND,
        }
    }
}

/// Bounded-retry configuration for settlement calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts for a transiently-failing step (including the first).
    pub max_attempts: u32,
    /// Base delay before the first retry; doubles per attempt.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: constants::DEFAULT_MAX_SETTLEMENT_ATTEMPTS,
            base_delay_ms: constants::DEFAULT_RETRY_BASE_DELAY_MS,
        }
    }
}

impl RetryConfig {
    /// Backoff delay before retrying after `attempt` failed attempts.
    #[must_use]
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        self.base_delay_ms.saturating_mul(1_u64 << attempt.min(16))
    }
}

/// Configuration for the slashing monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Fixed scan interval. Deliberately decoupled from lease duration
    /// granularity.
    pub scan_interval_secs: u64,
    /// The network the outbound slashing trigger targets.
    pub target_network: ChainId,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: constants::DEFAULT_SCAN_INTERVAL_SECS,
            target_network: ChainId(30_110),
        }
    }
}
