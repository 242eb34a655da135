//! System-wide constants for the LiqLease engine.

/// Seconds in a (non-leap) year, used for APR accrual.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Basis-point denominator: 10_000 bps = 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Weight applied to the APR spread term of the match score.
pub const APR_SPREAD_WEIGHT: u32 = 10;

/// Default lease duration requested when the caller supplies none (1 day).
pub const DEFAULT_DURATION_SECS: u64 = 86_400;

/// Default APR ceiling a demand is willing to pay (10%).
pub const DEFAULT_MAX_APR_BPS: u32 = 1_000;

/// Maximum number of offers a single demand may draw upon.
pub const DEFAULT_MAX_DRAWS_PER_DEMAND: usize = 16;

/// Default settlement attempt ceiling for transient failures.
pub const DEFAULT_MAX_SETTLEMENT_ATTEMPTS: u32 = 5;

/// Default base delay between settlement retries (milliseconds).
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 250;

/// Default slashing monitor scan interval (seconds).
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 30;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "LiqLease";
