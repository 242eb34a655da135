//! The lease ledger — atomic reservation and lifecycle transitions.
//!
//! `reserve` must be atomic with respect to the one-Active-lease-per-
//! (account, token) invariant: concurrent reservation attempts against the
//! same pair result in exactly one success and one `DuplicateActiveLease`
//! failure, never two Active leases. All operations take `&self` and
//! serialize on a single internal mutex; the critical section never spans
//! an external call.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use liqlease_types::{
    AccountId, FulfillmentReceipt, Lease, LeaseId, LeaseStatus, LiqleaseError, Result, SolverId,
    Token,
};
use rust_decimal::Decimal;

/// One pending lease reservation, produced from a committed draw.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub account: AccountId,
    pub token: Token,
    pub amount: Decimal,
    pub apr_bps: u32,
    pub max_duration_secs: u64,
    pub solver: SolverId,
}

#[derive(Default)]
struct LedgerState {
    /// All leases ever reserved, by id.
    leases: HashMap<LeaseId, Lease>,
    /// The single Active lease per (account, token), if any.
    active: HashMap<(AccountId, Token), LeaseId>,
    /// Lease ids per account, in reservation order.
    by_account: HashMap<AccountId, Vec<LeaseId>>,
    /// Next lease id to assign.
    next_id: u64,
}

/// The ledger of lease lifecycle state.
///
/// Interior mutability: every operation takes `&self`, so the ledger can
/// be shared (`Arc`) between the demand engine, the fulfillment
/// coordinator, and the slashing monitor.
pub struct LeaseLedger {
    state: Mutex<LedgerState>,
}

impl LeaseLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                next_id: 1,
                ..LedgerState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // A poisoned lock means a panic mid-bookkeeping; unrecoverable.
        self.state.lock().expect("lease ledger lock poisoned")
    }

    /// Reserve a single lease.
    ///
    /// # Errors
    /// Returns `DuplicateActiveLease` if an Active lease already exists
    /// for this (account, token).
    pub fn reserve(&self, reservation: Reservation, now: DateTime<Utc>) -> Result<LeaseId> {
        let mut state = self.lock();
        Self::reserve_locked(&mut state, &reservation, now)
    }

    /// Reserve a batch of leases, all-or-nothing, in one critical section.
    ///
    /// This is the commit step of an allocation: the duplicate check runs
    /// for the whole batch (including duplicates *within* the batch)
    /// before any lease is created, so a concurrent reservation that
    /// consumed one of the selected offers fails the entire commit rather
    /// than leaving a partial allocation behind.
    ///
    /// # Errors
    /// Returns `DuplicateActiveLease` naming the first conflicting pair;
    /// on error nothing is reserved.
    pub fn reserve_batch(
        &self,
        reservations: &[Reservation],
        now: DateTime<Utc>,
    ) -> Result<Vec<LeaseId>> {
        let mut state = self.lock();

        // Phase 1: validate the whole batch against current state.
        let mut seen: Vec<(AccountId, &Token)> = Vec::with_capacity(reservations.len());
        for r in reservations {
            let key = (r.account, r.token.clone());
            if state.active.contains_key(&key) || seen.contains(&(r.account, &r.token)) {
                return Err(LiqleaseError::DuplicateActiveLease {
                    account: r.account,
                    token: r.token.clone(),
                });
            }
            seen.push((r.account, &r.token));
        }

        // Phase 2: commit. Cannot fail after validation.
        let mut ids = Vec::with_capacity(reservations.len());
        for r in reservations {
            match Self::reserve_locked(&mut state, r, now) {
                Ok(id) => ids.push(id),
                Err(e) => return Err(e), // unreachable after phase 1
            }
        }
        Ok(ids)
    }

    fn reserve_locked(
        state: &mut LedgerState,
        reservation: &Reservation,
        now: DateTime<Utc>,
    ) -> Result<LeaseId> {
        let key = (reservation.account, reservation.token.clone());
        if state.active.contains_key(&key) {
            return Err(LiqleaseError::DuplicateActiveLease {
                account: reservation.account,
                token: reservation.token.clone(),
            });
        }

        let id = LeaseId(state.next_id);
        state.next_id += 1;

        let lease = Lease {
            id,
            account: reservation.account,
            token: reservation.token.clone(),
            amount: reservation.amount,
            apr_bps: reservation.apr_bps,
            max_duration_secs: reservation.max_duration_secs,
            started_at: now,
            solver: reservation.solver,
            status: LeaseStatus::Active,
        };

        tracing::info!(
            lease = %id,
            account = %reservation.account.short(),
            token = %reservation.token,
            amount = %reservation.amount,
            solver = %reservation.solver.short(),
            "lease reserved"
        );

        state.active.insert(key, id);
        state.by_account.entry(reservation.account).or_default().push(id);
        state.leases.insert(id, lease);
        Ok(id)
    }

    /// Look up a lease owned by `account`.
    ///
    /// # Errors
    /// Returns `LeaseNotFound` if the lease does not exist or belongs to a
    /// different account.
    pub fn get(&self, account: AccountId, lease_id: LeaseId) -> Result<Lease> {
        let state = self.lock();
        state
            .leases
            .get(&lease_id)
            .filter(|lease| lease.account == account)
            .cloned()
            .ok_or(LiqleaseError::LeaseNotFound(lease_id))
    }

    /// The lifecycle status of a lease slot; `None` for a slot that never
    /// held a lease.
    #[must_use]
    pub fn status(&self, account: AccountId, lease_id: LeaseId) -> LeaseStatus {
        self.get(account, lease_id)
            .map_or(LeaseStatus::None, |lease| lease.status)
    }

    /// Ids of the account's currently Active leases, in reservation order.
    #[must_use]
    pub fn list_active(&self, account: AccountId) -> Vec<LeaseId> {
        let state = self.lock();
        state
            .by_account
            .get(&account)
            .map(|ids| {
                ids.iter()
                    .filter(|id| {
                        state
                            .leases
                            .get(id)
                            .is_some_and(|l| l.status == LeaseStatus::Active)
                    })
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Transition a lease `Active → Fulfilled` and release its
    /// (account, token) slot.
    ///
    /// # Errors
    /// - `LeaseNotFound` if absent or owned by a different account
    /// - `InvalidTransition` if the status is not Active
    pub fn fulfill(
        &self,
        account: AccountId,
        lease_id: LeaseId,
        now: DateTime<Utc>,
    ) -> Result<FulfillmentReceipt> {
        let mut state = self.lock();
        let lease = state
            .leases
            .get_mut(&lease_id)
            .filter(|lease| lease.account == account)
            .ok_or(LiqleaseError::LeaseNotFound(lease_id))?;

        let rate_accrued = lease.accrued_rate(now);
        lease.mark_fulfilled()?;

        let receipt = FulfillmentReceipt {
            lease_id,
            account,
            token: lease.token.clone(),
            principal: lease.amount,
            rate_accrued,
            fulfilled_at: now,
        };
        let key = (account, lease.token.clone());
        state.active.remove(&key);

        tracing::info!(
            lease = %lease_id,
            account = %account.short(),
            principal = %receipt.principal,
            rate = %receipt.rate_accrued,
            "lease fulfilled"
        );
        Ok(receipt)
    }

    /// Accounts currently holding an Active lease for `token` — the
    /// slots with no drawable capacity this cycle. Sorted by account for
    /// determinism.
    #[must_use]
    pub fn active_accounts(&self, token: &Token) -> Vec<AccountId> {
        let state = self.lock();
        let mut accounts: Vec<AccountId> = state
            .active
            .keys()
            .filter(|(_, t)| t == token)
            .map(|(account, _)| *account)
            .collect();
        accounts.sort_unstable();
        accounts
    }

    /// Every (account, lease) pair ever reserved — the slashing monitor's
    /// read-only scan set.
    #[must_use]
    pub fn tracked(&self) -> Vec<(AccountId, LeaseId)> {
        let state = self.lock();
        let mut pairs: Vec<(AccountId, LeaseId)> = state
            .leases
            .values()
            .map(|lease| (lease.account, lease.id))
            .collect();
        pairs.sort_by_key(|&(_, id)| id);
        pairs
    }

    /// Total number of leases ever reserved.
    #[must_use]
    pub fn lease_count(&self) -> usize {
        self.lock().leases.len()
    }

    /// Number of currently Active leases.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.lock().active.len()
    }
}

impl Default for LeaseLedger {
    fn default() -> Self {
        Self::new()
    }
}
