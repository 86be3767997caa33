//! Identifiers used throughout daoreg.
//!
//! Table keys are small monotonic integers scoped to their owning table;
//! accounts are named. Only [`TradeId`] is a UUID, derived deterministically
//! from the offers it settles.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants;

// ---------------------------------------------------------------------------
// DaoId
// ---------------------------------------------------------------------------

/// Organization identifier. `0` is the synthetic system scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DaoId(pub u64);

impl DaoId {
    /// Scope of the system (quote) tokens.
    pub const SYSTEM: Self = Self(constants::SYSTEM_DAO_ID);

    #[must_use]
    pub fn is_system(self) -> bool {
        self == Self::SYSTEM
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for DaoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dao:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OfferId
// ---------------------------------------------------------------------------

/// Offer identifier, unique within one DAO's offer book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OfferId(pub u64);

impl OfferId {
    /// Sorts before every real offer id.
    pub const MIN: Self = Self(0);

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offer:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TokenId
// ---------------------------------------------------------------------------

/// Token registration index within a DAO. Allocated lowest-available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// BalanceId
// ---------------------------------------------------------------------------

/// Balance row identifier, unique within one account's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BalanceId(pub u64);

impl fmt::Display for BalanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "balance:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AccountName
// ---------------------------------------------------------------------------

/// A named account: members, organizations, token issuers, the registry itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountName(String);

impl AccountName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AccountName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

// ---------------------------------------------------------------------------
// TradeId
// ---------------------------------------------------------------------------

/// Trade identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TradeId(pub Uuid);

impl TradeId {
    /// Deterministic `TradeId` from the DAO and the offers involved.
    ///
    /// A resting offer settles at most once, so `(dao, maker)` already
    /// identifies the fill; the taker id is mixed in for readability of logs.
    #[must_use]
    pub fn deterministic(dao_id: DaoId, maker: OfferId, taker: Option<OfferId>) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"daoreg:trade_id:v1:");
        hasher.update(dao_id.0.to_le_bytes());
        hasher.update(maker.0.to_le_bytes());
        hasher.update(taker.map_or(0, |id| id.0).to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&hash[..16]);
        Self(Uuid::from_bytes(bytes))
    }

    /// First four bytes in hex, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0.as_bytes()[..4])
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
