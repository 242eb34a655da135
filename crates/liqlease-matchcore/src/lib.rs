//! # liqlease-matchcore
//!
//! **Pure deterministic matching for LiqLease.**
//!
//! MatchCore is the compute plane — it takes a demand request and a set of
//! liquidity offers and produces a ranked match or a greedy allocation.
//! It has:
//!
//! - **Zero side effects**: no ledger writes, no config reads, no clocks
//! - **Deterministic output**: same demand + same offers -> same allocation
//! - **Total ordering**: every tie is broken down to the account id, so
//!   results are reproducible run-to-run and machine-to-machine
//!
//! Allocations produced here are **advisory**: nothing is reserved until
//! the ledger commits them, and the commit re-validates capacity.

pub mod allocator;
pub mod digest;
pub mod scorer;

pub use allocator::{Allocation, Draw, allocate, coalesce};
pub use digest::compute_allocation_digest;
pub use scorer::{MatchOutcome, RankedMatch, admissible_for_draw, rank, score};
