//! Canonical allocation digest — the payload an attestation report covers.
//!
//! The matching environment signs the digest of the allocation it
//! produced; the ingress gate recomputes the digest from the proposal it
//! received and requires the report to cover exactly that hash. Any
//! tampering with draws, amounts, or ordering changes the digest.

use sha2::{Digest, Sha256};

use crate::allocator::Allocation;

/// Compute the canonical SHA-256 digest of an allocation.
///
/// This is a deterministic hash that depends on:
/// - The demand id
/// - Each draw's account, token, and amount (in draw order)
/// - The completeness flag and total drawn
///
/// The same allocation always produces the same digest.
#[must_use]
pub fn compute_allocation_digest(allocation: &Allocation) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"liqlease:allocation:v1:");
    hasher.update(allocation.demand_id.0.as_bytes());
    hasher.update((allocation.draws.len() as u64).to_le_bytes());

    for draw in &allocation.draws {
        hasher.update(draw.offer.account.as_bytes());
        hasher.update(draw.offer.token.as_str().as_bytes());
        hasher.update(draw.amount_drawn.to_string().as_bytes());
    }

    hasher.update(allocation.total_drawn.to_string().as_bytes());
    hasher.update([u8::from(allocation.complete)]);

    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}
