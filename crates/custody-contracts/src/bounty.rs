//! Bounty board.
//!
//! A poster locks a reward; hunters submit solution references while the
//! bounty is active; the poster approves exactly one hunter, who then
//! holds the reward as a claim and withdraws it with `withdraw_payments`.
//!
//! Whether the approved hunter must have submitted is an
//! [`ApprovalRule`], fixed at construction.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use custody_ledger::{EventJournal, Ledger};
use custody_settlement::{
    ClaimRequest, Custodian, CustodyCore, PullPayment, ValueTransfer, settle,
};
use custody_types::{
    AccountId, Amount, ApprovalRule, BountyConfig, BountyId, BountyState, Clock, CustodyError,
    CustodyEvent, Result, Timestamp,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounty {
    pub id: BountyId,
    pub poster: AccountId,
    pub amount: Amount,
    pub state: BountyState,
    pub accepted_hunter: Option<AccountId>,
    pub posted_at: Timestamp,
    pub closed_at: Option<Timestamp>,
}

pub struct BountyBoard {
    core: CustodyCore<PullPayment>,
    clock: Arc<dyn Clock>,
    approval: ApprovalRule,
    bounties: BTreeMap<BountyId, Bounty>,
    submissions: HashMap<(BountyId, AccountId), String>,
    last_id: BountyId,
}

impl BountyBoard {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: &BountyConfig) -> Self {
        Self {
            core: CustodyCore::new(PullPayment),
            clock,
            approval: config.approval,
            bounties: BTreeMap::new(),
            submissions: HashMap::new(),
            last_id: BountyId(0),
        }
    }

    pub fn post_bounty(&mut self, poster: AccountId, amount: Amount) -> Result<BountyId> {
        self.core.ensure_idle()?;
        if amount.is_zero() {
            return Err(CustodyError::ZeroValue);
        }
        let id = self.last_id.next()?;
        self.core.ledger_mut()?.credit_locked(poster, amount)?;
        self.last_id = id;
        let now = self.clock.now();
        self.bounties.insert(
            id,
            Bounty {
                id,
                poster,
                amount,
                state: BountyState::Active,
                accepted_hunter: None,
                posted_at: now,
                closed_at: None,
            },
        );
        self.core
            .record(now, CustodyEvent::BountyPosted { id, poster, amount })?;
        info!(bounty = %id, poster = %poster, amount = %amount, "bounty posted");
        Ok(id)
    }

    fn lookup(&self, id: BountyId) -> Result<Bounty> {
        let bounty = *self
            .bounties
            .get(&id)
            .ok_or(CustodyError::BountyNotFound(id))?;
        Ok(bounty)
    }

    fn ensure_active(bounty: &Bounty) -> Result<()> {
        if bounty.state == BountyState::Active {
            Ok(())
        } else {
            Err(CustodyError::InvalidState {
                current: bounty.state.to_string(),
                expected: BountyState::Active.to_string(),
            })
        }
    }

    /// Record (or replace) `hunter`'s solution reference.
    pub fn submit_solution(
        &mut self,
        hunter: AccountId,
        id: BountyId,
        reference: impl Into<String>,
    ) -> Result<()> {
        self.core.ensure_idle()?;
        let bounty = self.lookup(id)?;
        Self::ensure_active(&bounty)?;
        self.submissions.insert((id, hunter), reference.into());
        self.core
            .record(self.clock.now(), CustodyEvent::SolutionSubmitted { id, hunter })?;
        debug!(bounty = %id, hunter = %hunter, "solution submitted");
        Ok(())
    }

    /// Poster closes the bounty in favour of `hunter`.
    pub fn approve(&mut self, caller: AccountId, id: BountyId, hunter: AccountId) -> Result<()> {
        self.core.ensure_idle()?;
        let bounty = self.lookup(id)?;
        if caller != bounty.poster {
            return Err(CustodyError::Unauthorized);
        }
        Self::ensure_active(&bounty)?;
        if self.approval == ApprovalRule::RequireSubmission
            && !self.submissions.contains_key(&(id, hunter))
        {
            return Err(CustodyError::SubmissionMissing { bounty: id, hunter });
        }

        self.core
            .ledger_mut()?
            .transfer_locked(bounty.poster, hunter, bounty.amount)?;

        let now = self.clock.now();
        if let Some(entry) = self.bounties.get_mut(&id) {
            entry.state = BountyState::Closed;
            entry.accepted_hunter = Some(hunter);
            entry.closed_at = Some(now);
        }
        self.core.record(
            now,
            CustodyEvent::BountyApproved {
                id,
                hunter,
                amount: bounty.amount,
            },
        )?;
        info!(bounty = %id, hunter = %hunter, amount = %bounty.amount, "bounty approved");
        Ok(())
    }

    /// Pay the caller everything it has won.
    pub fn withdraw_payments(
        &mut self,
        caller: AccountId,
        transfer: &mut dyn ValueTransfer<Self>,
    ) -> Result<Amount> {
        let request = ClaimRequest::full(caller, self.clock.now());
        settle(self, request, transfer)
    }

    #[must_use]
    pub fn bounty(&self, id: BountyId) -> Option<&Bounty> {
        self.bounties.get(&id)
    }

    #[must_use]
    pub fn submission(&self, id: BountyId, hunter: AccountId) -> Option<&str> {
        self.submissions.get(&(id, hunter)).map(String::as_str)
    }

    /// Every hunter that submitted to `id`, in account order.
    #[must_use]
    pub fn hunters(&self, id: BountyId) -> Vec<AccountId> {
        let mut hunters: Vec<AccountId> = self
            .submissions
            .keys()
            .filter(|(bounty, _)| *bounty == id)
            .map(|(_, hunter)| *hunter)
            .collect();
        hunters.sort();
        hunters
    }

    #[must_use]
    pub fn approval_rule(&self) -> ApprovalRule {
        self.approval
    }

    #[must_use]
    pub fn payments_of(&self, account: AccountId) -> Amount {
        self.core.ledger().balance_of(account)
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        self.core.ledger()
    }

    #[must_use]
    pub fn journal(&self) -> &EventJournal {
        self.core.journal()
    }
}

impl Custodian for BountyBoard {
    type Policy = PullPayment;

    fn core(&self) -> &CustodyCore<PullPayment> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CustodyCore<PullPayment> {
        &mut self.core
    }
}

#[cfg(test)]
mod tests {
    use custody_settlement::Wallets;
    use custody_types::ManualClock;

    use super::*;

    fn board(approval: ApprovalRule) -> BountyBoard {
        BountyBoard::new(
            Arc::new(ManualClock::new(Timestamp(0))),
            &BountyConfig { approval },
        )
    }

    #[test]
    fn post_locks_reward() {
        let mut board = board(ApprovalRule::RequireSubmission);
        let poster = AccountId::new();
        let id = board.post_bounty(poster, Amount::new(3)).unwrap();
        let bounty = board.bounty(id).unwrap();
        assert_eq!(bounty.state, BountyState::Active);
        assert_eq!(bounty.accepted_hunter, None);
        assert_eq!(board.ledger().locked_of(poster), Amount::new(3));
    }

    #[test]
    fn zero_bounty_rejected() {
        let mut board = board(ApprovalRule::RequireSubmission);
        assert_eq!(
            board.post_bounty(AccountId::new(), Amount::ZERO),
            Err(CustodyError::ZeroValue)
        );
    }

    #[test]
    fn exhausted_ids_leave_ledger_untouched() {
        let mut board = board(ApprovalRule::RequireSubmission);
        board.last_id = BountyId(u64::MAX);
        let poster = AccountId::new();
        assert_eq!(
            board.post_bounty(poster, Amount::new(3)),
            Err(CustodyError::Overflow)
        );
        assert_eq!(board.ledger().custody(), Amount::ZERO);
        assert_eq!(board.ledger().locked_of(poster), Amount::ZERO);
        assert!(board.bounty(BountyId(u64::MAX)).is_none());
        assert!(board.journal().is_empty());
    }

    #[test]
    fn resubmission_overwrites() {
        let mut board = board(ApprovalRule::RequireSubmission);
        let id = board.post_bounty(AccountId::new(), Amount::new(3)).unwrap();
        let hunter = AccountId::new();
        board.submit_solution(hunter, id, "ipfs://v1").unwrap();
        board.submit_solution(hunter, id, "ipfs://v2").unwrap();
        assert_eq!(board.submission(id, hunter), Some("ipfs://v2"));
        assert_eq!(board.hunters(id), vec![hunter]);
    }

    #[test]
    fn approve_requires_submission_by_default() {
        let mut board = board(ApprovalRule::RequireSubmission);
        let poster = AccountId::new();
        let hunter = AccountId::new();
        let id = board.post_bounty(poster, Amount::new(3)).unwrap();
        assert_eq!(
            board.approve(poster, id, hunter),
            Err(CustodyError::SubmissionMissing { bounty: id, hunter })
        );
        board.submit_solution(hunter, id, "fix").unwrap();
        board.approve(poster, id, hunter).unwrap();
        assert_eq!(board.payments_of(hunter), Amount::new(3));
    }

    #[test]
    fn any_account_rule_skips_submission_check() {
        let mut board = board(ApprovalRule::AnyAccount);
        let poster = AccountId::new();
        let hunter = AccountId::new();
        let id = board.post_bounty(poster, Amount::new(3)).unwrap();
        board.approve(poster, id, hunter).unwrap();
        assert_eq!(board.bounty(id).unwrap().accepted_hunter, Some(hunter));
    }

    #[test]
    fn non_poster_cannot_approve() {
        let mut board = board(ApprovalRule::AnyAccount);
        let id = board.post_bounty(AccountId::new(), Amount::new(3)).unwrap();
        let other = AccountId::new();
        assert_eq!(
            board.approve(other, id, other),
            Err(CustodyError::Unauthorized)
        );
    }

    #[test]
    fn closed_bounty_is_frozen() {
        let mut board = board(ApprovalRule::AnyAccount);
        let poster = AccountId::new();
        let hunter = AccountId::new();
        let id = board.post_bounty(poster, Amount::new(3)).unwrap();
        board.approve(poster, id, hunter).unwrap();
        assert!(matches!(
            board.approve(poster, id, hunter),
            Err(CustodyError::InvalidState { .. })
        ));
        assert!(matches!(
            board.submit_solution(AccountId::new(), id, "late"),
            Err(CustodyError::InvalidState { .. })
        ));
        assert_eq!(board.payments_of(hunter), Amount::new(3));
    }

    #[test]
    fn withdraw_with_nothing_owed_is_no_claim() {
        let mut board = board(ApprovalRule::AnyAccount);
        assert_eq!(
            board.withdraw_payments(AccountId::new(), &mut Wallets::new()),
            Err(CustodyError::NoClaim)
        );
    }

    #[test]
    fn unknown_bounty() {
        let mut board = board(ApprovalRule::AnyAccount);
        assert_eq!(
            board.submit_solution(AccountId::new(), BountyId(4), "x"),
            Err(CustodyError::BountyNotFound(BountyId(4)))
        );
    }
}
