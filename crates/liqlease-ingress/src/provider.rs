//! The match-provider seam — where allocation proposals come from.
//!
//! In production the provider is a remote attested matching environment;
//! [`LocalMatchProvider`] runs the same allocator in-process and signs its
//! own digests, which is what tests and single-node deployments use.

use ed25519_dalek::SigningKey;
use liqlease_matchcore::{Allocation, allocate, compute_allocation_digest};
use liqlease_types::{AttestationReport, DemandRequest, Measurement, Offer, Result};

/// An allocation plus the proof the engine needs before trusting it.
#[derive(Debug, Clone)]
pub struct AllocationProposal {
    pub allocation: Allocation,
    /// Digest the proposer computed. Advisory: the engine recomputes its
    /// own digest from `allocation` and verifies the report against that.
    pub digest: [u8; 32],
    pub report: Option<AttestationReport>,
}

/// Producer of allocation proposals for demand requests.
pub trait MatchProvider: Send + Sync {
    fn propose(&self, request: &DemandRequest, offers: &[Offer]) -> Result<AllocationProposal>;
}

/// In-process provider: runs the greedy allocator and attests the result
/// with its own signing key and measurement.
pub struct LocalMatchProvider {
    signing_key: SigningKey,
    measurement: Measurement,
}

impl LocalMatchProvider {
    #[must_use]
    pub fn new(signing_key: SigningKey, measurement: Measurement) -> Self {
        Self {
            signing_key,
            measurement,
        }
    }
}

impl MatchProvider for LocalMatchProvider {
    fn propose(&self, request: &DemandRequest, offers: &[Offer]) -> Result<AllocationProposal> {
        let allocation = allocate(request, offers);
        let digest = compute_allocation_digest(&allocation);
        let report = AttestationReport::issue(digest, self.measurement, &self.signing_key);
        Ok(AllocationProposal {
            allocation,
            digest,
            report: Some(report),
        })
    }
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::SigningKey;
    use liqlease_types::AccountId;
    use rand::rngs::OsRng;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn local_provider_report_covers_recomputed_digest() {
        let key = SigningKey::generate(&mut OsRng);
        let verifying = key.verifying_key();
        let provider = LocalMatchProvider::new(key, [1u8; 32]);

        let offers = [Offer::dummy(AccountId::dummy(1), Decimal::new(2000, 0))];
        let request = DemandRequest::dummy(Decimal::new(1000, 0));
        let proposal = provider.propose(&request, &offers).unwrap();

        let recomputed = compute_allocation_digest(&proposal.allocation);
        assert_eq!(proposal.digest, recomputed);

        let report = proposal.report.expect("local provider always attests");
        assert_eq!(report.payload_hash, recomputed);
        assert!(report.verify_signature(&verifying).is_ok());
    }
}
