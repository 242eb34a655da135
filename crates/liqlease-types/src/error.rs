//! Error types for the LiqLease engine.
//!
//! All errors use the `LQ_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Offer / demand errors
//! - 2xx: Allocation errors
//! - 3xx: Ledger errors
//! - 4xx: Attestation errors
//! - 5xx: Settlement errors
//! - 6xx: Slashing errors
//! - 9xx: General / internal errors
//!
//! `Incompatible` is deliberately **not** an error: scoring a request
//! against an offer that fails a ceiling check is a filter outcome, modeled
//! as a variant of the scorer's return type, not as a failure.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, LeaseId, LeaseStatus, Token};

/// Central error enum for all LiqLease operations.
#[derive(Debug, Error)]
pub enum LiqleaseError {
    // =================================================================
    // Offer / Demand Errors (1xx)
    // =================================================================
    /// The demand request failed validation (zero token, bad values, etc.).
    #[error("LQ_ERR_100: Invalid demand: {reason}")]
    InvalidDemand { reason: String },

    /// No lease configuration is published for this (account, token).
    #[error("LQ_ERR_101: No lease config for account {account} token {token}")]
    ConfigNotFound { account: AccountId, token: Token },

    /// A published lease configuration failed validation.
    #[error("LQ_ERR_102: Invalid lease config: {reason}")]
    InvalidConfig { reason: String },

    // =================================================================
    // Allocation Errors (2xx)
    // =================================================================
    /// Total offer capacity cannot satisfy the demand and the caller did
    /// not opt into a partial allocation.
    #[error("LQ_ERR_200: Insufficient capacity: requested {requested}, available {available}")]
    InsufficientCapacity {
        requested: Decimal,
        available: Decimal,
    },

    // =================================================================
    // Ledger Errors (3xx)
    // =================================================================
    /// An Active lease already exists for this (account, token) pair.
    #[error("LQ_ERR_300: Duplicate active lease for account {account} token {token}")]
    DuplicateActiveLease { account: AccountId, token: Token },

    /// The requested lease was not found for the given account.
    #[error("LQ_ERR_301: Lease not found: {0}")]
    LeaseNotFound(LeaseId),

    /// The lease cannot make the requested status transition.
    #[error("LQ_ERR_302: Invalid transition for {lease_id}: status is {status}")]
    InvalidTransition {
        lease_id: LeaseId,
        status: LeaseStatus,
    },

    // =================================================================
    // Attestation Errors (4xx)
    // =================================================================
    /// The allocation proposal carried no attestation report.
    #[error("LQ_ERR_400: Attestation report missing from allocation proposal")]
    AttestationMissing,

    /// The attestation report failed verification. Always fatal to the
    /// matching cycle — never degraded to a warning.
    #[error("LQ_ERR_401: Attestation failed: {reason}")]
    AttestationFailed { reason: String },

    // =================================================================
    // Settlement Errors (5xx)
    // =================================================================
    /// A transient network failure (timeout, connection reset). Retryable
    /// with backoff up to a bounded attempt count.
    #[error("LQ_ERR_500: Transient network failure: {reason}")]
    TransientNetwork { reason: String },

    /// The solver's spending authorization was insufficient or reverted.
    /// Fatal — never retried.
    #[error("LQ_ERR_501: Authorization failure: {reason}")]
    AuthorizationFailure { reason: String },

    /// Settlement submission was rejected by the ledger of record. Fatal.
    #[error("LQ_ERR_502: Settlement rejected: {reason}")]
    SettlementRejected { reason: String },

    /// The bounded retry budget was exhausted on transient failures.
    #[error("LQ_ERR_503: Retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    // =================================================================
    // Slashing Errors (6xx)
    // =================================================================
    /// The outbound slashing trigger failed for one lease. Logged and
    /// swallowed by the monitor; surfaced only in per-scan summaries.
    #[error("LQ_ERR_600: Slashing trigger failed for {lease_id}: {reason}")]
    SlashingFailed { lease_id: LeaseId, reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("LQ_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("LQ_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("LQ_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk, network).
    #[error("LQ_ERR_903: I/O error: {0}")]
    Io(String),
}

impl LiqleaseError {
    /// Whether this error may be retried with backoff. Only transient
    /// network failures qualify; everything else is surfaced immediately.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientNetwork { .. })
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LiqleaseError>;

// Conversion from std::io::Error
impl From<std::io::Error> for LiqleaseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
