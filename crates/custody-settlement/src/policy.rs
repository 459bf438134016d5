//! Gating policies: who may claim, and how much.
//!
//! A policy never moves value. It answers [`Policy::claimable`] from the
//! ledger and its own records, and in [`Policy::on_settled`] retires the
//! claim it granted, before the handoff runs. Rollback of those effects
//! goes through [`Policy::checkpoint`] / [`Policy::rollback`].

use custody_ledger::Ledger;
use custody_types::{AccountId, Amount, Result, Timestamp};

/// One settlement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimRequest {
    /// The claimant, who is also the payee.
    pub account: AccountId,
    /// Amount asked for, for policies that pay a caller-chosen amount.
    pub requested: Option<Amount>,
    /// Clock reading at the time of the request.
    pub now: Timestamp,
}

impl ClaimRequest {
    /// Request whatever the policy will grant.
    #[must_use]
    pub fn full(account: AccountId, now: Timestamp) -> Self {
        Self {
            account,
            requested: None,
            now,
        }
    }

    /// Request a specific amount.
    #[must_use]
    pub fn exact(account: AccountId, amount: Amount, now: Timestamp) -> Self {
        Self {
            account,
            requested: Some(amount),
            now,
        }
    }
}

pub trait Policy {
    /// Policy-owned state needed to undo one `on_settled`.
    type Checkpoint;

    /// Amount payable for `request` right now. Zero means no claim.
    ///
    /// # Errors
    /// Any gate refusal (`Locked`, `CooldownActive`, `InsufficientAllowance`,
    /// `NoFunds`, ...). Must not mutate anything.
    fn claimable(&self, ledger: &Ledger, request: &ClaimRequest) -> Result<Amount>;

    fn checkpoint(&self, account: AccountId) -> Self::Checkpoint;

    /// Retire `amount` from the ledger and from policy records.
    fn on_settled(
        &mut self,
        ledger: &mut Ledger,
        request: &ClaimRequest,
        amount: Amount,
    ) -> Result<()>;

    fn rollback(&mut self, checkpoint: Self::Checkpoint);
}
