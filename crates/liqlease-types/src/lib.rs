//! # liqlease-types
//!
//! Shared types, errors, and configuration for the **LiqLease** lease
//! matching and fulfillment engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`SolverId`], [`LeaseId`], [`DemandId`], [`ChainId`], [`Token`]
//! - **Offer model**: [`Offer`], [`LeaseConfig`], [`DemandRequest`]
//! - **Lease model**: [`Lease`], [`LeaseStatus`], [`FulfillmentReceipt`]
//! - **Attestation model**: [`AttestationReport`], [`Measurement`]
//! - **Configuration**: [`EngineConfig`], [`RetryConfig`], [`MonitorConfig`]
//! - **Errors**: [`LiqleaseError`] with `LQ_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod attestation;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod lease;
pub mod offer;

// Re-export all primary types at crate root for ergonomic imports:
//   use liqlease_types::{Lease, Offer, DemandRequest, ...};

pub use attestation::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use lease::*;
pub use offer::*;

// Constants are accessed via `liqlease_types::constants::FOO`
// (not re-exported to avoid name collisions).
