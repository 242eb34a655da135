//! # liqlease-ingress
//!
//! **The demand plane**: everything between an inbound demand request and
//! a committed batch of lease reservations.
//!
//! ## Architecture
//!
//! ```text
//! publish() ──▶ LeaseConfigRegistry ──▶ OfferStore (materialized offers)
//!                                             │
//! serve() ──▶ DemandEngine ──▶ MatchProvider (allocation + report)
//!                   │                 │
//!                   │          AttestationGate — verify BEFORE any
//!                   │                 │          ledger call
//!                   └────────▶ LeaseLedger::reserve_batch()
//! ```
//!
//! The engine trusts no allocation until the gate has verified its
//! attestation report against the recomputed digest; a failed or missing
//! report aborts the cycle with no ledger side effects.

pub mod engine;
pub mod gate;
pub mod offer_store;
pub mod provider;
pub mod registry;

pub use engine::{DemandEngine, DemandOutcome};
pub use gate::AttestationGate;
pub use offer_store::{InMemoryOfferStore, OfferStore};
pub use provider::{AllocationProposal, LocalMatchProvider, MatchProvider};
pub use registry::{LeaseConfigRegistry, RegistrationOutcome};
