//! Attestation report types — proof that a matching computation ran in a
//! trusted environment unmodified.
//!
//! The matching environment signs the SHA-256 digest of the allocation it
//! produced with its ed25519 attestation key and reports the enclave
//! measurement it booted from. The gate on the ingress side verifies both
//! against an allowlist before any allocation is trusted. The attestation
//! subsystem itself (quote generation, measurement provisioning) is an
//! external collaborator; this crate only models the report and its
//! verification.

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::{LiqleaseError, Result};

/// An enclave measurement (hash of the matching environment's image).
pub type Measurement = [u8; 32];

/// A verifiable attestation report covering one allocation proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationReport {
    /// SHA-256 digest of the canonical allocation payload this report covers.
    pub payload_hash: [u8; 32],
    /// Measurement of the environment that computed the allocation.
    pub measurement: Measurement,
    /// Ed25519 signature over `payload_hash` by the environment's key.
    pub signature: Vec<u8>,
    /// When the report was issued.
    pub issued_at: DateTime<Utc>,
}

impl AttestationReport {
    /// Issue a report for `payload_hash` from inside the matching
    /// environment, signing with its attestation key.
    #[must_use]
    pub fn issue(payload_hash: [u8; 32], measurement: Measurement, key: &SigningKey) -> Self {
        let signature = key.sign(&payload_hash);
        Self {
            payload_hash,
            measurement,
            signature: signature.to_bytes().to_vec(),
            issued_at: Utc::now(),
        }
    }

    /// Verify the signature against a candidate attester key.
    ///
    /// # Errors
    /// Returns `AttestationFailed` on a malformed or non-verifying
    /// signature. Callers are responsible for checking `payload_hash` and
    /// `measurement` against their own expectations.
    pub fn verify_signature(&self, key: &VerifyingKey) -> Result<()> {
        let signature = Signature::from_slice(&self.signature).map_err(|e| {
            LiqleaseError::AttestationFailed {
                reason: format!("malformed signature: {e}"),
            }
        })?;
        key.verify_strict(&self.payload_hash, &signature)
            .map_err(|e| LiqleaseError::AttestationFailed {
                reason: format!("signature verification failed: {e}"),
            })
    }
}
