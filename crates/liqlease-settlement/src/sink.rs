//! The settlement sink — the boundary to the ledger of record.
//!
//! Implementations classify their failures through `LiqleaseError`:
//! `TransientNetwork` is the only retryable class; `AuthorizationFailure`
//! and `SettlementRejected` are fatal and surface immediately.

use liqlease_types::{Lease, Result, SolverId, Token};
use rust_decimal::Decimal;

/// Outbound settlement operations for closing a lease.
#[allow(async_fn_in_trait)]
pub trait SettlementSink: Send + Sync {
    /// Ensure the solver's spending authorization covers `amount` of
    /// `token` before settlement is attempted.
    async fn ensure_authorization(
        &self,
        solver: SolverId,
        token: &Token,
        amount: Decimal,
    ) -> Result<()>;

    /// Submit the settlement of `amount_due` (principal plus accrued
    /// rate) for `lease` to the ledger of record.
    async fn submit_settlement(&self, lease: &Lease, amount_due: Decimal) -> Result<()>;
}
