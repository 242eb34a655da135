//! The attestation gate — the trust boundary between the matching
//! environment's output and the ledger.
//!
//! Every allocation proposal must carry a report whose signature, signer,
//! measurement, and covered digest all check out. Any failure is fatal to
//! the matching cycle; the gate never degrades a bad report to a warning.

use ed25519_dalek::VerifyingKey;
use liqlease_types::{AttestationReport, LiqleaseError, Measurement, Result};

/// Verifier for attestation reports against an allowlist of attester keys
/// and environment measurements.
pub struct AttestationGate {
    trusted_keys: Vec<VerifyingKey>,
    allowed_measurements: Vec<Measurement>,
}

impl AttestationGate {
    #[must_use]
    pub fn new(trusted_keys: Vec<VerifyingKey>, allowed_measurements: Vec<Measurement>) -> Self {
        Self {
            trusted_keys,
            allowed_measurements,
        }
    }

    /// Verify that `report` covers exactly `digest` and was issued by a
    /// trusted environment.
    ///
    /// `digest` must be recomputed by the caller from the proposal it
    /// actually received, never taken from the proposal itself.
    ///
    /// # Errors
    /// - `AttestationMissing` if there is no report
    /// - `AttestationFailed` on digest mismatch, unknown measurement,
    ///   untrusted signer, or a bad signature
    pub fn verify(&self, digest: &[u8; 32], report: Option<&AttestationReport>) -> Result<()> {
        let Some(report) = report else {
            tracing::warn!("allocation proposal carried no attestation report");
            return Err(LiqleaseError::AttestationMissing);
        };

        if &report.payload_hash != digest {
            return Self::reject("report covers a different allocation digest");
        }
        if !self.allowed_measurements.contains(&report.measurement) {
            return Self::reject("environment measurement not in allowlist");
        }
        if !self
            .trusted_keys
            .iter()
            .any(|key| report.verify_signature(key).is_ok())
        {
            return Self::reject("signature does not verify under any trusted key");
        }
        Ok(())
    }

    fn reject(reason: &str) -> Result<()> {
        tracing::warn!(reason, "attestation rejected");
        Err(LiqleaseError::AttestationFailed {
            reason: reason.to_string(),
        })
    }
}
