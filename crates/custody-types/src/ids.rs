//! Identifiers used throughout the custody engine.
//!
//! Accounts use UUIDv7 so they sort by creation time. Workflow instances
//! (escrows, bounties) use per-engine monotonic counters.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CustodyError, Result};

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Identity of a participant: depositor, beneficiary, claimant, or owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Deterministic account for tests: every byte set to `tag`.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn dummy(tag: u8) -> Self {
        Self(Uuid::from_bytes([tag; 16]))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// EscrowId
// ---------------------------------------------------------------------------

/// Escrow identifier, assigned monotonically from 1 by the escrow book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EscrowId(pub u64);

impl EscrowId {
    /// The identifier following this one.
    pub fn next(self) -> Result<Self> {
        self.0.checked_add(1).map(Self).ok_or(CustodyError::Overflow)
    }
}

impl fmt::Display for EscrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "escrow#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// BountyId
// ---------------------------------------------------------------------------

/// Bounty identifier, assigned monotonically from 1 by the bounty board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BountyId(pub u64);

impl BountyId {
    pub fn next(self) -> Result<Self> {
        self.0.checked_add(1).map(Self).ok_or(CustodyError::Overflow)
    }
}

impl fmt::Display for BountyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bounty#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_ids_are_unique() {
        let a = AccountId::new();
        let b = AccountId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn account_ids_sort_by_creation() {
        let first = AccountId::new();
        let second = AccountId::new();
        assert!(first < second);
    }

    #[test]
    fn dummy_accounts_are_deterministic() {
        assert_eq!(AccountId::dummy(0xab), AccountId::dummy(0xab));
        assert_ne!(AccountId::dummy(1), AccountId::dummy(2));
    }

    #[test]
    fn escrow_ids_advance() {
        let id = EscrowId(1);
        assert_eq!(id.next(), Ok(EscrowId(2)));
        assert_eq!(format!("{}", id.next().unwrap()), "escrow#2");
    }

    #[test]
    fn exhausted_ids_overflow() {
        assert_eq!(EscrowId(u64::MAX).next(), Err(CustodyError::Overflow));
        assert_eq!(BountyId(u64::MAX).next(), Err(CustodyError::Overflow));
    }

    #[test]
    fn bounty_id_display() {
        assert_eq!(format!("{}", BountyId(7)), "bounty#7");
    }
}
