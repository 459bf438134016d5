//! Observations emitted by the custody engines.
//!
//! Each event is appended exactly once, after the transition it describes
//! has been applied. Failed operations emit nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, BountyId, EscrowId};

/// A single externally visible observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustodyEvent {
    /// A claim was paid out of custody.
    Settled { account: AccountId, amount: Amount },
    /// Value entered the pool without crediting any account.
    Deposited { from: AccountId, amount: Amount },
    /// The owner overwrote a beneficiary's allowance.
    AllowanceSet {
        beneficiary: AccountId,
        amount: Amount,
    },
    EscrowDeposited {
        id: EscrowId,
        buyer: AccountId,
        seller: AccountId,
        amount: Amount,
    },
    EscrowConfirmed { id: EscrowId },
    EscrowRefunded { id: EscrowId },
    BountyPosted {
        id: BountyId,
        poster: AccountId,
        amount: Amount,
    },
    SolutionSubmitted { id: BountyId, hunter: AccountId },
    BountyApproved {
        id: BountyId,
        hunter: AccountId,
        amount: Amount,
    },
    /// A faucet payout completed.
    Claimed { account: AccountId, amount: Amount },
    /// A treasury call carried a payload it does not interpret.
    FallbackCalled {
        from: AccountId,
        amount: Amount,
        data_len: u64,
    },
    /// `None` on either side means "no owner" (genesis or renounced).
    OwnershipTransferred {
        previous: Option<AccountId>,
        new: Option<AccountId>,
    },
}

impl CustodyEvent {
    /// Stable upper-case tag for filtering and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Settled { .. } => "SETTLED",
            Self::Deposited { .. } => "DEPOSITED",
            Self::AllowanceSet { .. } => "ALLOWANCE_SET",
            Self::EscrowDeposited { .. } => "ESCROW_DEPOSITED",
            Self::EscrowConfirmed { .. } => "ESCROW_CONFIRMED",
            Self::EscrowRefunded { .. } => "ESCROW_REFUNDED",
            Self::BountyPosted { .. } => "BOUNTY_POSTED",
            Self::SolutionSubmitted { .. } => "SOLUTION_SUBMITTED",
            Self::BountyApproved { .. } => "BOUNTY_APPROVED",
            Self::Claimed { .. } => "CLAIMED",
            Self::FallbackCalled { .. } => "FALLBACK_CALLED",
            Self::OwnershipTransferred { .. } => "OWNERSHIP_TRANSFERRED",
        }
    }
}

fn opt(account: Option<&AccountId>) -> String {
    account.map_or_else(|| "none".to_string(), ToString::to_string)
}

/// Canonical single-line form. Journal digests are computed over it, so
/// the field order here is part of the digest format.
impl fmt::Display for CustodyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match self {
            Self::Settled { account, amount } | Self::Claimed { account, amount } => {
                write!(f, "{kind} account={account} amount={amount}")
            }
            Self::Deposited { from, amount } => write!(f, "{kind} from={from} amount={amount}"),
            Self::AllowanceSet {
                beneficiary,
                amount,
            } => write!(f, "{kind} beneficiary={beneficiary} amount={amount}"),
            Self::EscrowDeposited {
                id,
                buyer,
                seller,
                amount,
            } => write!(
                f,
                "{kind} id={id} buyer={buyer} seller={seller} amount={amount}"
            ),
            Self::EscrowConfirmed { id } | Self::EscrowRefunded { id } => {
                write!(f, "{kind} id={id}")
            }
            Self::BountyPosted { id, poster, amount } => {
                write!(f, "{kind} id={id} poster={poster} amount={amount}")
            }
            Self::SolutionSubmitted { id, hunter } => write!(f, "{kind} id={id} hunter={hunter}"),
            Self::BountyApproved { id, hunter, amount } => {
                write!(f, "{kind} id={id} hunter={hunter} amount={amount}")
            }
            Self::FallbackCalled {
                from,
                amount,
                data_len,
            } => write!(f, "{kind} from={from} amount={amount} data_len={data_len}"),
            Self::OwnershipTransferred { previous, new } => write!(
                f,
                "{kind} previous={} new={}",
                opt(previous.as_ref()),
                opt(new.as_ref())
            ),
        }
    }
}
