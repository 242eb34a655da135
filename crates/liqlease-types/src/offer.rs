//! Offer-side types: the standing authorization an account publishes
//! ([`LeaseConfig`]), the offer materialized from it at matching time
//! ([`Offer`]), and the solver's transient [`DemandRequest`].
//!
//! Offers are never mutated: reconfiguration publishes a new `LeaseConfig`
//! and the next matching cycle materializes a fresh `Offer` from it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, DemandId, LiqleaseError, Result, Token};

/// The standing per-(account, token) authorization a smart account
/// publishes. Every [`Offer`] is derived from the owning account's current
/// config at request time; configs change only through an explicit
/// reconfiguration call by the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseConfig {
    /// The token this authorization covers.
    pub token: Token,
    /// Maximum amount the account is willing to lease out at once.
    pub max_amount: Decimal,
    /// Annualized rate the account charges, in basis points.
    pub apr_bps: u32,
    /// Longest lease duration the account tolerates, in seconds.
    pub max_duration_secs: u64,
}

impl LeaseConfig {
    /// Structural validation. The registry rejects invalid configs before
    /// they can ever materialize as offers.
    pub fn validate(&self) -> Result<()> {
        if self.max_amount <= Decimal::ZERO {
            return Err(LiqleaseError::InvalidConfig {
                reason: format!("max_amount must be positive, got {}", self.max_amount),
            });
        }
        if self.max_duration_secs == 0 {
            return Err(LiqleaseError::InvalidConfig {
                reason: "max_duration_secs must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// A liquidity offer: one account's willingness to lease up to
/// `max_amount` of `token` for at most `max_duration_secs`, charging
/// `max_apr_bps`. Immutable once materialized; superseded, not mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// The liquidity-providing account.
    pub account: AccountId,
    /// The token on offer.
    pub token: Token,
    /// Amount ceiling.
    pub max_amount: Decimal,
    /// Rate ceiling charged by the account, in basis points.
    pub max_apr_bps: u32,
    /// Duration ceiling, in seconds.
    pub max_duration_secs: u64,
}

impl Offer {
    /// Materialize an offer from an account's current config.
    #[must_use]
    pub fn from_config(account: AccountId, config: &LeaseConfig) -> Self {
        Self {
            account,
            token: config.token.clone(),
            max_amount: config.max_amount,
            max_apr_bps: config.apr_bps,
            max_duration_secs: config.max_duration_secs,
        }
    }
}

/// A solver's demand for liquidity. Transient — exists only for the
/// duration of one matching cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRequest {
    /// Identifies this matching cycle.
    pub id: DemandId,
    /// The token demanded.
    pub token: Token,
    /// Amount demanded.
    pub amount: Decimal,
    /// How long the solver wants the capital, in seconds.
    pub duration_wanted_secs: u64,
    /// The highest annualized rate the solver will pay, in basis points.
    pub max_apr_bps: u32,
}

impl DemandRequest {
    /// Structural validation. Zero-amount demands are valid (they allocate
    /// to an empty, complete allocation); negative amounts are not.
    pub fn validate(&self) -> Result<()> {
        if self.amount.is_sign_negative() {
            return Err(LiqleaseError::InvalidDemand {
                reason: format!("amount must be non-negative, got {}", self.amount),
            });
        }
        if self.duration_wanted_secs == 0 {
            return Err(LiqleaseError::InvalidDemand {
                reason: "duration_wanted_secs must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Offer {
    /// A USDC offer for unit tests.
    #[must_use]
    pub fn dummy(account: AccountId, max_amount: Decimal) -> Self {
        Self {
            account,
            token: Token::new("USDC"),
            max_amount,
            max_apr_bps: 500,
            max_duration_secs: 86_400,
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl DemandRequest {
    /// A USDC demand for unit tests.
    #[must_use]
    pub fn dummy(amount: Decimal) -> Self {
        Self {
            id: DemandId::new(),
            token: Token::new("USDC"),
            amount,
            duration_wanted_secs: 86_400,
            max_apr_bps: 1_000,
        }
    }
}
