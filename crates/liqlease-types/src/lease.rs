//! # Lease — the durable unit of the system
//!
//! A `Lease` is a time-bounded, amount-bounded draw of liquidity from one
//! smart account by one solver.
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  reserve   ┌────────┐  fulfill   ┌───────────┐
//!   │ NONE ├───────────▶│ ACTIVE ├───────────▶│ FULFILLED │
//!   └──────┘            └────────┘            └───────────┘
//! ```
//!
//! `status` is the only mutable field and transitions are **monotonic** —
//! there is no path back. Default is deliberately *not* a stored state:
//! it is the derived predicate [`Lease::is_defaulted`], re-evaluated on
//! each query against a caller-supplied clock. Storing it would let the
//! ledger and the slashing monitor disagree about a transition that
//! depends on wall-clock time observed at different moments.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, LeaseId, LiqleaseError, SolverId, Token, constants};

/// The lifecycle status of a lease.
///
/// `None` is the pre-reservation state: the ledger reports it for slots
/// that have never held a lease. Transitions:
/// - `None → Active` (reservation)
/// - `Active → Fulfilled` (settlement confirmed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaseStatus {
    /// No lease has been reserved in this slot.
    None,
    /// Capital is out with the solver; the account's (account, token) slot
    /// is occupied until fulfillment.
    Active,
    /// Principal plus accrued rate has been returned. **Irreversible.**
    Fulfilled,
}

impl LeaseStatus {
    /// Can this status transition to the given target?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::None, Self::Active) | (Self::Active, Self::Fulfilled)
        )
    }
}

impl std::fmt::Display for LeaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Fulfilled => write!(f, "FULFILLED"),
        }
    }
}

/// One active or settled credit line between a smart account and a solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lease {
    /// Ledger-assigned identity, immutable.
    pub id: LeaseId,
    /// The lending smart account.
    pub account: AccountId,
    /// The leased token.
    pub token: Token,
    /// Principal drawn.
    pub amount: Decimal,
    /// Annualized rate charged, in basis points (fixed at reservation).
    pub apr_bps: u32,
    /// Duration ceiling, in seconds. Exceeding it while Active means the
    /// lease is in default.
    pub max_duration_secs: u64,
    /// When the reservation was committed.
    pub started_at: DateTime<Utc>,
    /// The solver responsible for repayment.
    pub solver: SolverId,
    /// Current lifecycle status.
    pub status: LeaseStatus,
}

impl Lease {
    /// Seconds elapsed since the lease started, clamped at zero.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        (now - self.started_at).num_seconds().max(0) as u64
    }

    /// Rate accrued so far: `amount × apr_bps / 10_000 × elapsed / year`.
    #[must_use]
    pub fn accrued_rate(&self, now: DateTime<Utc>) -> Decimal {
        let elapsed = Decimal::from(self.elapsed_secs(now));
        self.amount * Decimal::from(self.apr_bps) / Decimal::from(constants::BPS_DENOMINATOR)
            * elapsed
            / Decimal::from(constants::SECONDS_PER_YEAR)
    }

    /// Total owed at `now`: principal plus accrued rate.
    #[must_use]
    pub fn amount_due(&self, now: DateTime<Utc>) -> Decimal {
        self.amount + self.accrued_rate(now)
    }

    /// The derived default predicate: still Active with the duration
    /// ceiling strictly exceeded. Evaluated against the caller's clock,
    /// never stored.
    #[must_use]
    pub fn is_defaulted(&self, now: DateTime<Utc>) -> bool {
        self.status == LeaseStatus::Active && self.elapsed_secs(now) > self.max_duration_secs
    }

    /// Attempt the `Active → Fulfilled` transition.
    ///
    /// # Errors
    /// Returns `InvalidTransition` if the current status is not Active.
    pub fn mark_fulfilled(&mut self) -> crate::Result<()> {
        if !self.status.can_transition_to(LeaseStatus::Fulfilled) {
            return Err(LiqleaseError::InvalidTransition {
                lease_id: self.id,
                status: self.status,
            });
        }
        self.status = LeaseStatus::Fulfilled;
        Ok(())
    }
}

/// Receipt returned by the ledger when a lease is fulfilled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentReceipt {
    pub lease_id: LeaseId,
    pub account: AccountId,
    pub token: Token,
    /// Principal returned to the account.
    pub principal: Decimal,
    /// Rate accrued between reservation and fulfillment.
    pub rate_accrued: Decimal,
    pub fulfilled_at: DateTime<Utc>,
}

impl FulfillmentReceipt {
    /// Total returned to the lender.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.principal + self.rate_accrued
    }
}

/// Dummy lease for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Lease {
    #[must_use]
    pub fn dummy(id: u64, amount: Decimal, started_at: DateTime<Utc>) -> Self {
        Self {
            id: LeaseId(id),
            account: AccountId::dummy(1),
            token: Token::new("USDC"),
            amount,
            apr_bps: 500,
            max_duration_secs: 86_400,
            started_at,
            solver: SolverId::dummy(9),
            status: LeaseStatus::Active,
        }
    }
}
