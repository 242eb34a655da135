//! # liqlease-settlement
//!
//! **The finality plane**: closing leases out and punishing the ones that
//! never close.
//!
//! ## Architecture
//!
//! ```text
//! FulfillmentCoordinator ──▶ SettlementSink (authorize, submit)
//!          │                        with bounded retry on transient errors
//!          └──▶ LeaseLedger::fulfill()   — transition last, race-tolerant
//!
//! SlashingMonitor ──▶ LeaseLedger::tracked()  — read-only scan
//!          └──▶ SlashingTrigger::slash()      — per-lease, failures logged
//! ```
//!
//! All external effects sit behind async traits so tests can script
//! transient failures and observe call counts without any network.

pub mod fulfillment;
pub mod sink;
pub mod slashing;

pub use fulfillment::{FulfillmentCoordinator, FulfillmentOutcome};
pub use sink::SettlementSink;
pub use slashing::{ScanSummary, SlashingMonitor, SlashingTrigger};
