//! Greedy allocation — select an ordered subset of offers whose combined
//! capacity meets a demand.
//!
//! ## Algorithm
//!
//! 1. Coalesce offers so each (account, token) appears once — only one
//!    Active lease per account/token is permitted downstream
//! 2. Drop offers that fail the draw-admissibility filter (token,
//!    duration, APR ceilings)
//! 3. Sort ascending by drawable capacity, smallest first: exhausting
//!    small offers before touching large reserve capacity bounds the
//!    number of leases opened and keeps large offers unfragmented
//! 4. Accumulate draws until the running total covers the demand; offers
//!    beyond the satisfying point are not touched
//!
//! If total capacity is insufficient the result is a **partial**
//! allocation with `complete = false` — a caller decision, not an error.
//! The allocation is advisory until the ledger commits it.

use liqlease_types::{AccountId, DemandId, DemandRequest, Offer};
use rust_decimal::Decimal;

use crate::scorer::admissible_for_draw;

/// One draw against a single offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub offer: Offer,
    pub amount_drawn: Decimal,
}

/// The result of one greedy allocation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// The demand this allocation answers.
    pub demand_id: DemandId,
    /// Ordered draws, in commit order.
    pub draws: Vec<Draw>,
    /// Sum of `amount_drawn` across draws.
    pub total_drawn: Decimal,
    /// Whether the demand is fully covered. Callers must not reserve a
    /// partial allocation as if it were complete.
    pub complete: bool,
}

impl Allocation {
    /// The accounts drawn upon, in draw order.
    #[must_use]
    pub fn accounts(&self) -> Vec<AccountId> {
        self.draws.iter().map(|d| d.offer.account).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

/// Coalesce offers so that each (account, token) pair appears at most
/// once. Ceilings merge conservatively: amounts sum, the charged APR is
/// the maximum, the duration ceiling is the minimum. Output is sorted by
/// account id for determinism.
#[must_use]
pub fn coalesce(offers: &[Offer]) -> Vec<Offer> {
    let mut merged: Vec<Offer> = Vec::with_capacity(offers.len());
    for offer in offers {
        if let Some(existing) = merged
            .iter_mut()
            .find(|o| o.account == offer.account && o.token == offer.token)
        {
            existing.max_amount += offer.max_amount;
            existing.max_apr_bps = existing.max_apr_bps.max(offer.max_apr_bps);
            existing.max_duration_secs = existing.max_duration_secs.min(offer.max_duration_secs);
        } else {
            merged.push(offer.clone());
        }
    }
    merged.sort_by(|a, b| a.account.cmp(&b.account).then_with(|| a.token.cmp(&b.token)));
    merged
}

/// Greedily allocate `request.amount` across `offers`.
///
/// Deterministic: the same offers and the same demand produce the same
/// allocation, run-to-run. Zero demand yields an empty, complete
/// allocation.
#[must_use]
pub fn allocate(request: &DemandRequest, offers: &[Offer]) -> Allocation {
    if request.amount.is_zero() {
        return Allocation {
            demand_id: request.id,
            draws: vec![],
            total_drawn: Decimal::ZERO,
            complete: true,
        };
    }

    let mut admissible: Vec<Offer> = coalesce(offers)
        .into_iter()
        .filter(|offer| admissible_for_draw(request, offer))
        .collect();

    // Smallest drawable capacity first; account id breaks exact ties.
    admissible.sort_by(|a, b| {
        a.max_amount
            .cmp(&b.max_amount)
            .then_with(|| a.account.cmp(&b.account))
    });

    let mut draws = Vec::new();
    let mut total = Decimal::ZERO;
    for offer in admissible {
        if total >= request.amount {
            break;
        }
        let remaining = request.amount - total;
        let drawn = offer.max_amount.min(remaining);
        total += drawn;
        draws.push(Draw {
            offer,
            amount_drawn: drawn,
        });
    }

    let complete = total >= request.amount;
    tracing::debug!(
        demand = %request.id,
        token = %request.token,
        requested = %request.amount,
        drawn = %total,
        draws = draws.len(),
        complete,
        "greedy allocation"
    );

    Allocation {
        demand_id: request.id,
        draws,
        total_drawn: total,
        complete,
    }
}
