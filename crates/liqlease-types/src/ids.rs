//! Globally unique identifiers used throughout LiqLease.
//!
//! Account and solver identities are 20-byte addresses (the ledger of
//! record is address-based). Demand requests use UUIDv7 for time-ordered
//! sorting; lease IDs are assigned by the ledger as a monotonic counter.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Identity of a smart account holding passive liquidity.
/// This is the raw 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// SolverId
// ---------------------------------------------------------------------------

/// Identity of a solver — the active counterparty drawing leased liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SolverId(pub [u8; 20]);

impl SolverId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for SolverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// LeaseId
// ---------------------------------------------------------------------------

/// Ledger-assigned lease identifier. Monotonically increasing, immutable
/// once assigned at reservation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct LeaseId(pub u64);

impl LeaseId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for LeaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lease:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DemandId
// ---------------------------------------------------------------------------

/// Identifier for one demand request / matching cycle. Uses UUIDv7 for
/// time-ordered sorting. Transient — a demand outlives at most one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DemandId(pub Uuid);

impl DemandId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Extract the embedded timestamp (milliseconds since UNIX epoch) from UUIDv7.
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        let bytes = self.0.as_bytes();
        u64::from_be_bytes([
            0, 0, bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5],
        ])
    }
}

impl Default for DemandId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DemandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "demand:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ChainId
// ---------------------------------------------------------------------------

/// Target network identifier for the outbound slashing trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ChainId(pub u32);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A token symbol (e.g., "USDC"). Offers and demands only ever match
/// within the same token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Token(pub String);

impl Token {
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Deterministic dummy identities for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl AccountId {
    #[must_use]
    pub fn dummy(tag: u8) -> Self {
        Self([tag; 20])
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl SolverId {
    #[must_use]
    pub fn dummy(tag: u8) -> Self {
        Self([tag; 20])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demand_id_uniqueness() {
        let a = DemandId::new();
        let b = DemandId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn demand_id_ordering() {
        let a = DemandId::new();
        let b = DemandId::new();
        assert!(a < b);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn demand_id_timestamp_extraction() {
        let before = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let id = DemandId::new();
        let after = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let ts = id.timestamp_ms();
        assert!(
            ts >= before && ts <= after,
            "ts={ts}, before={before}, after={after}"
        );
    }

    #[test]
    fn lease_id_next() {
        let id = LeaseId(5);
        assert_eq!(id.next(), LeaseId(6));
    }

    #[test]
    fn account_id_display_is_hex() {
        let id = AccountId::dummy(0xab);
        let rendered = format!("{id}");
        assert!(rendered.starts_with("0xabab"));
        assert_eq!(rendered.len(), 2 + 40);
    }

    #[test]
    fn account_id_short() {
        let id = AccountId::dummy(0x01);
        assert_eq!(id.short(), "01010101");
    }

    #[test]
    fn account_id_ordering_is_byte_order() {
        assert!(AccountId::dummy(1) < AccountId::dummy(2));
    }

    #[test]
    fn token_symbol() {
        let token = Token::new("USDC");
        assert_eq!(token.as_str(), "USDC");
        assert_eq!(format!("{token}"), "USDC");
    }

    #[test]
    fn serde_roundtrips() {
        let did = DemandId::new();
        let json = serde_json::to_string(&did).unwrap();
        let back: DemandId = serde_json::from_str(&json).unwrap();
        assert_eq!(did, back);

        let lid = LeaseId(42);
        let json = serde_json::to_string(&lid).unwrap();
        let back: LeaseId = serde_json::from_str(&json).unwrap();
        assert_eq!(lid, back);

        let acct = AccountId::dummy(7);
        let json = serde_json::to_string(&acct).unwrap();
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(acct, back);
    }
}
