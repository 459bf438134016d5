//! Workflow states for the state-machine policies.
//!
//! ## Escrow
//!
//! ```text
//!   ┌───────────┐  buyer confirms  ┌───────────┐
//!   │ DEPOSITED ├─────────────────▶│ CONFIRMED │  (seller may claim)
//!   └─────┬─────┘                  └───────────┘
//!         │ buyer refunds
//!         ▼
//!   ┌──────────┐
//!   │ REFUNDED │  (buyer may claim)
//!   └──────────┘
//! ```
//!
//! ## Bounty
//!
//! ```text
//!   ┌────────┐  poster approves  ┌────────┐
//!   │ ACTIVE ├──────────────────▶│ CLOSED │  (hunter may claim)
//!   └────────┘                   └────────┘
//! ```
//!
//! Every transition is one-way. A terminal state never changes again,
//! which is what makes each payout happen at most once.

use serde::{Deserialize, Serialize};

/// Lifecycle of a single escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowState {
    /// Funds locked under the buyer, awaiting the buyer's decision.
    Deposited,
    /// Buyer confirmed delivery; the seller holds the claim.
    Confirmed,
    /// Buyer refunded; the claim is back with the buyer.
    Refunded,
}

impl EscrowState {
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Deposited, Self::Confirmed | Self::Refunded)
        )
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Deposited)
    }
}

impl std::fmt::Display for EscrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposited => write!(f, "DEPOSITED"),
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Refunded => write!(f, "REFUNDED"),
        }
    }
}

/// Lifecycle of a single bounty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BountyState {
    Active,
    Closed,
}

impl BountyState {
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Active, Self::Closed))
    }
}

impl std::fmt::Display for BountyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}
