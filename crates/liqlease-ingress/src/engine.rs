//! The demand engine — drives one matching cycle from inbound demand to
//! committed lease reservations.
//!
//! Order of operations is load-bearing: the attestation gate verifies the
//! proposal **before** any ledger call, so a failed or missing report
//! leaves the ledger untouched. Scoring and allocation run against a
//! possibly-stale offer snapshot; the batch reservation is the commit-time
//! re-check, and an abandoned cycle has no side effects.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use liqlease_ledger::{LeaseLedger, Reservation};
use liqlease_matchcore::compute_allocation_digest;
use liqlease_types::{
    AccountId, DemandId, DemandRequest, EngineConfig, LeaseId, LiqleaseError, Offer, Result,
    SolverId, Token,
};
use rust_decimal::Decimal;

use crate::{gate::AttestationGate, offer_store::OfferStore, provider::MatchProvider};

/// What one served demand produced.
#[derive(Debug, Clone)]
pub struct DemandOutcome {
    pub demand_id: DemandId,
    /// Reserved leases, in draw order.
    pub lease_ids: Vec<LeaseId>,
    /// Accounts drawn upon, in draw order.
    pub accounts: Vec<AccountId>,
    pub total_drawn: Decimal,
    /// False only when the caller opted into a partial fill.
    pub complete: bool,
}

/// One matching cycle: materialize offers, obtain a proposal, verify its
/// attestation, commit the batch.
pub struct DemandEngine<S: OfferStore, P: MatchProvider> {
    store: S,
    provider: P,
    gate: AttestationGate,
    ledger: Arc<LeaseLedger>,
    config: EngineConfig,
}

impl<S: OfferStore, P: MatchProvider> DemandEngine<S, P> {
    #[must_use]
    pub fn new(
        store: S,
        provider: P,
        gate: AttestationGate,
        ledger: Arc<LeaseLedger>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            provider,
            gate,
            ledger,
            config,
        }
    }

    /// Serve a fully-specified demand request on behalf of `solver`.
    ///
    /// With `allow_partial = false`, an allocation that cannot cover the
    /// whole demand fails with `InsufficientCapacity` and nothing is
    /// reserved; with `allow_partial = true` the partial fill is committed
    /// and reported via `complete = false`.
    pub fn serve(
        &self,
        request: &DemandRequest,
        solver: SolverId,
        allow_partial: bool,
        now: DateTime<Utc>,
    ) -> Result<DemandOutcome> {
        request.validate()?;

        // An offer is consumed for the lifetime of its lease: slots with
        // an Active lease have no drawable capacity this cycle. The
        // snapshot can go stale before commit; `reserve_batch` re-checks
        // under its own lock.
        let occupied = self.ledger.active_accounts(&request.token);
        let offers: Vec<Offer> = self
            .store
            .offers_for(&request.token)
            .into_iter()
            .filter(|offer| !occupied.contains(&offer.account))
            .collect();
        let proposal = self.provider.propose(request, &offers)?;

        // Trust nothing the provider sent until the report checks out
        // against a digest recomputed from the received allocation.
        let digest = compute_allocation_digest(&proposal.allocation);
        self.gate.verify(&digest, proposal.report.as_ref())?;

        let allocation = proposal.allocation;
        if allocation.demand_id != request.id {
            return Err(LiqleaseError::Internal(format!(
                "proposal answers {} but {} was asked",
                allocation.demand_id, request.id
            )));
        }
        if !allocation.complete && !allow_partial {
            return Err(LiqleaseError::InsufficientCapacity {
                requested: request.amount,
                available: allocation.total_drawn,
            });
        }
        if allocation.draws.len() > self.config.max_draws_per_demand {
            return Err(LiqleaseError::InvalidDemand {
                reason: format!(
                    "demand would fragment across {} leases (limit {})",
                    allocation.draws.len(),
                    self.config.max_draws_per_demand
                ),
            });
        }

        let reservations: Vec<Reservation> = allocation
            .draws
            .iter()
            .map(|draw| Reservation {
                account: draw.offer.account,
                token: draw.offer.token.clone(),
                amount: draw.amount_drawn,
                apr_bps: draw.offer.max_apr_bps,
                max_duration_secs: draw.offer.max_duration_secs,
                solver,
            })
            .collect();
        let lease_ids = self.ledger.reserve_batch(&reservations, now)?;

        tracing::info!(
            demand = %request.id,
            solver = %solver.short(),
            token = %request.token,
            requested = %request.amount,
            drawn = %allocation.total_drawn,
            leases = lease_ids.len(),
            complete = allocation.complete,
            "demand served"
        );
        Ok(DemandOutcome {
            demand_id: request.id,
            lease_ids,
            accounts: allocation.accounts(),
            total_drawn: allocation.total_drawn,
            complete: allocation.complete,
        })
    }

    /// Serve the minimal inbound surface `{ token, amount }`, filling the
    /// duration and APR ceiling from the engine defaults. Partial fills
    /// are not committed on this path.
    pub fn serve_simple(
        &self,
        solver: SolverId,
        token: Token,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<DemandOutcome> {
        let request = DemandRequest {
            id: DemandId::new(),
            token,
            amount,
            duration_wanted_secs: self.config.default_duration_secs,
            max_apr_bps: self.config.default_max_apr_bps,
        };
        self.serve(&request, solver, false, now)
    }

    /// The ledger this engine commits into.
    #[must_use]
    pub fn ledger(&self) -> &Arc<LeaseLedger> {
        &self.ledger
    }
}
