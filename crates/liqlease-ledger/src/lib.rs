//! # liqlease-ledger
//!
//! **The Lease Ledger**: lifecycle state for every lease, with atomic
//! reservation semantics.
//!
//! ## Architecture
//!
//! The ledger is the serialization point of the matching path. Scoring
//! and allocation run against possibly-stale offer snapshots; the ledger's
//! single critical section is where the one-Active-lease-per-(account,
//! token) invariant is actually enforced:
//!
//! ```text
//! DemandEngine → reserve_batch()  — all-or-nothing commit
//! Coordinator  → fulfill()        — ACTIVE → FULFILLED transition
//! Monitor      → tracked()/get()  — read-only, derived-default queries
//! ```
//!
//! No lock is ever held across an external call; the critical section
//! covers only in-memory bookkeeping.

pub mod ledger;

pub use ledger::{LeaseLedger, Reservation};
