//! # Reentrancy
//!
//! A recipient that gets control during a payout and calls straight back
//! into the engine. Against the unguarded donation box it drains every
//! other depositor; against anything built on `settle` it gets exactly
//! its own claim and every nested mutation is refused.

mod common;

use common::{clock_at, init_tracing};
use custody_contracts::{
    AllowanceVault, BountyBoard, DonationBox, Donations, EscrowBook, Faucet, Ownership,
    TimelockVault, Treasury, VulnerableDonationBox,
};
use custody_settlement::testing::{RejectingTransfer, ReentrantRecipient};
use custody_settlement::{Custodian, TransferRejected, ValueTransfer, Wallets};
use custody_types::{
    AccountId, Amount, AuthorizationOracle, BountyConfig, CustodyError, CustodyEvent,
    FaucetConfig, Result, Timestamp,
};

/// Re-enters `withdraw` from inside every payout until the engine refuses.
struct Attacker {
    account: AccountId,
    received: Amount,
    nested: Vec<Result<Amount>>,
}

impl Attacker {
    fn new(account: AccountId) -> Self {
        Self {
            account,
            received: Amount::ZERO,
            nested: Vec::new(),
        }
    }

    fn refusals(&self) -> Vec<&CustodyError> {
        self.nested.iter().filter_map(|r| r.as_ref().err()).collect()
    }
}

impl<B: Donations> ValueTransfer<B> for Attacker {
    fn transfer(
        &mut self,
        donations: &mut B,
        _to: AccountId,
        amount: Amount,
    ) -> std::result::Result<(), TransferRejected> {
        self.received = self
            .received
            .checked_add(amount)
            .ok_or_else(|| TransferRejected::new("attacker wallet overflow"))?;
        // Keep going while the books still show a claim and there is
        // value left to take.
        if donations.custody() >= donations.balance_of(self.account) {
            let account = self.account;
            let outcome = donations.withdraw(account, &mut *self);
            self.nested.push(outcome);
        }
        Ok(())
    }
}

fn fund_victim_and_attacker<B: Donations>(donations: &mut B) -> (AccountId, AccountId) {
    let victim = AccountId::new();
    let attacker = AccountId::new();
    donations.deposit(victim, Amount::from_tokens(7)).unwrap();
    donations.deposit(attacker, Amount::from_tokens(1)).unwrap();
    assert_eq!(donations.custody(), Amount::from_tokens(8));
    (victim, attacker)
}

// ═══════════════════════════════════════════════════════════════════
// The 7 + 1 scenario
// ═══════════════════════════════════════════════════════════════════

#[test]
fn unguarded_box_is_drained() {
    init_tracing();
    let (_, clock) = clock_at(0);
    let mut donations = VulnerableDonationBox::new(clock);
    let (victim, attacker_id) = fund_victim_and_attacker(&mut donations);

    let mut attacker = Attacker::new(attacker_id);
    let paid = donations.withdraw(attacker_id, &mut attacker).unwrap();

    // Seven nested payouts on top of the outer one.
    assert_eq!(paid, Amount::from_tokens(1));
    assert_eq!(attacker.received, Amount::from_tokens(8));
    assert_eq!(attacker.nested.len(), 7);
    assert!(attacker.refusals().is_empty());
    assert_eq!(donations.journal().of_kind("SETTLED").len(), 8);
    assert_eq!(donations.custody(), Amount::ZERO);

    // The victim's claim survives on the books with nothing behind it.
    assert_eq!(donations.balance_of(victim), Amount::from_tokens(7));
    assert!(!donations.ledger().is_solvent());
    assert!(matches!(
        donations.ledger().verify_solvency(),
        Err(CustodyError::SolvencyViolation { .. })
    ));
    assert!(matches!(
        donations.withdraw(victim, &mut Wallets::new()),
        Err(CustodyError::NoFunds)
    ));
}

#[test]
fn guarded_box_pays_attacker_only_its_own_claim() {
    init_tracing();
    let (_, clock) = clock_at(0);
    let mut donations = DonationBox::new(clock);
    let (victim, attacker_id) = fund_victim_and_attacker(&mut donations);

    let mut attacker = Attacker::new(attacker_id);
    let paid = donations.withdraw(attacker_id, &mut attacker).unwrap();

    assert_eq!(paid, Amount::from_tokens(1));
    assert_eq!(attacker.received, Amount::from_tokens(1));
    assert_eq!(attacker.refusals(), vec![&CustodyError::ReentrantCall]);
    assert_eq!(donations.custody(), Amount::from_tokens(7));
    assert!(donations.ledger().verify_solvency().is_ok());

    let mut wallets = Wallets::new();
    assert_eq!(
        donations.withdraw(victim, &mut wallets),
        Ok(Amount::from_tokens(7))
    );
    assert_eq!(donations.custody(), Amount::ZERO);
    assert_eq!(donations.journal().of_kind("SETTLED").len(), 2);
}

#[test]
fn guarded_box_nested_deposit_is_refused() {
    let (_, clock) = clock_at(0);
    let mut donations = DonationBox::new(clock);
    let who = AccountId::new();
    donations.deposit(who, Amount::new(5)).unwrap();

    let mut recipient = ReentrantRecipient::new(|inner: &mut DonationBox| {
        // The claim is already retired when control arrives here.
        assert_eq!(inner.balance_of(who), Amount::ZERO);
        inner.deposit(who, Amount::new(1))
    });
    donations.withdraw(who, &mut recipient).unwrap();
    assert!(matches!(recipient.outcomes(), [Err(CustodyError::ReentrantCall)]));
    assert_eq!(recipient.wallets().received(who), Amount::new(5));
}

// ═══════════════════════════════════════════════════════════════════
// Every engine refuses nested mutation
// ═══════════════════════════════════════════════════════════════════

#[test]
fn escrow_refuses_nested_calls() {
    let (_, clock) = clock_at(0);
    let mut book = EscrowBook::new(clock);
    let (buyer, seller) = (AccountId::new(), AccountId::new());
    let first = book.create_escrow(buyer, seller, Amount::new(4)).unwrap();
    let second = book.create_escrow(buyer, seller, Amount::new(6)).unwrap();
    book.confirm(buyer, first).unwrap();

    let mut recipient = ReentrantRecipient::new(|inner: &mut EscrowBook| {
        inner.confirm(buyer, second)?;
        inner.create_escrow(buyer, seller, Amount::new(1)).map(|_| ())
    });
    assert_eq!(book.withdraw_payments(seller, &mut recipient), Ok(Amount::new(4)));
    assert!(matches!(recipient.outcomes(), [Err(CustodyError::ReentrantCall)]));

    // Nothing from inside the handoff took effect.
    assert_eq!(book.escrow_count(), 2);
    assert_eq!(book.payments_of(seller), Amount::ZERO);
    book.confirm(buyer, second).unwrap();
    assert_eq!(book.payments_of(seller), Amount::new(6));
}

#[test]
fn bounty_board_refuses_nested_withdraw() {
    let (_, clock) = clock_at(0);
    let mut board = BountyBoard::new(clock, &BountyConfig::default());
    let (poster, hunter) = (AccountId::new(), AccountId::new());
    let id = board.post_bounty(poster, Amount::new(9)).unwrap();
    board.submit_solution(hunter, id, "proof").unwrap();
    board.approve(poster, id, hunter).unwrap();

    let mut recipient = ReentrantRecipient::new(|inner: &mut BountyBoard| {
        inner
            .withdraw_payments(hunter, &mut Wallets::new())
            .map(|_| ())
    });
    assert_eq!(board.withdraw_payments(hunter, &mut recipient), Ok(Amount::new(9)));
    assert!(matches!(recipient.outcomes(), [Err(CustodyError::ReentrantCall)]));
    assert_eq!(recipient.wallets().received(hunter), Amount::new(9));
}

#[test]
fn allowance_vault_refuses_nested_allowance_change() {
    let (_, clock) = clock_at(0);
    let owner = AccountId::new();
    let mut vault = AllowanceVault::new(clock, Ownership::new(owner));
    vault.fund(owner, Amount::new(100)).unwrap();
    vault.set_allowance(owner, owner, Amount::new(10)).unwrap();

    let mut recipient = ReentrantRecipient::new(|inner: &mut AllowanceVault| {
        inner.set_allowance(owner, owner, Amount::new(1_000))?;
        inner.renounce_ownership(owner)
    });
    assert_eq!(
        vault.withdraw(owner, Amount::new(10), &mut recipient),
        Ok(Amount::new(10))
    );
    assert!(matches!(recipient.outcomes(), [Err(CustodyError::ReentrantCall)]));
    assert_eq!(vault.allowance(owner), Amount::ZERO);
    assert!(vault.authority().is_owner(owner));
    assert_eq!(vault.journal().of_kind("OWNERSHIP_TRANSFERRED").len(), 1);
}

#[test]
fn timelock_vault_refuses_nested_withdraw() {
    let (_, clock) = clock_at(100);
    let owner = AccountId::new();
    let mut vault = TimelockVault::new(clock, Ownership::new(owner), Timestamp(50));
    vault.deposit(owner, Amount::new(3)).unwrap();

    let mut recipient = ReentrantRecipient::new(|inner: &mut TimelockVault| {
        assert_eq!(inner.balance(), Amount::ZERO);
        inner.withdraw(owner, &mut Wallets::new()).map(|_| ())
    });
    assert_eq!(vault.withdraw(owner, &mut recipient), Ok(Amount::new(3)));
    assert!(matches!(recipient.outcomes(), [Err(CustodyError::ReentrantCall)]));
}

#[test]
fn treasury_refuses_nested_payout_and_ownership_change() {
    let (_, clock) = clock_at(0);
    let owner = AccountId::new();
    let mut treasury = Treasury::new(clock, Ownership::new(owner));
    treasury.receive(owner, Amount::new(10)).unwrap();

    let mut recipient = ReentrantRecipient::new(|inner: &mut Treasury| {
        inner.withdraw(owner, owner, Amount::new(6), &mut Wallets::new())?;
        inner.transfer_ownership(owner, AccountId::new())?;
        inner.fallback(owner, Amount::new(1), b"x")
    });
    assert_eq!(
        treasury.withdraw(owner, owner, Amount::new(4), &mut recipient),
        Ok(Amount::new(4))
    );
    assert!(matches!(recipient.outcomes(), [Err(CustodyError::ReentrantCall)]));
    assert_eq!(treasury.balance(), Amount::new(6));
    assert!(treasury.authority().is_owner(owner));
}

#[test]
fn faucet_refuses_nested_claim() {
    let (_, clock) = clock_at(0);
    let mut faucet = Faucet::new(clock, &FaucetConfig::default());
    faucet.fund(AccountId::new(), Amount::from_tokens(50)).unwrap();
    let user = AccountId::new();
    let accomplice = AccountId::new();

    let mut recipient = ReentrantRecipient::new(|inner: &mut Faucet| {
        inner.claim(accomplice, &mut Wallets::new()).map(|_| ())
    });
    assert_eq!(faucet.claim(user, &mut recipient), Ok(Amount::from_tokens(10)));
    assert!(matches!(recipient.outcomes(), [Err(CustodyError::ReentrantCall)]));
    assert_eq!(faucet.last_claim_at(accomplice), None);
    assert_eq!(faucet.balance(), Amount::from_tokens(40));
}

// ═══════════════════════════════════════════════════════════════════
// Rejected handoffs roll back
// ═══════════════════════════════════════════════════════════════════

#[test]
fn rejected_transfer_restores_every_engine() {
    init_tracing();
    let (_, clock) = clock_at(0);

    let mut donations = DonationBox::new(clock.clone());
    let who = AccountId::new();
    donations.deposit(who, Amount::new(5)).unwrap();
    let mut reject = RejectingTransfer::new("recipient reverted");
    assert_eq!(
        donations.withdraw(who, &mut reject),
        Err(CustodyError::TransferRejected {
            reason: "recipient reverted".into()
        })
    );
    assert_eq!(donations.balance_of(who), Amount::new(5));
    assert_eq!(donations.custody(), Amount::new(5));
    // Guard released: a retry with a willing recipient goes through.
    assert_eq!(donations.withdraw(who, &mut Wallets::new()), Ok(Amount::new(5)));

    let mut faucet = Faucet::new(clock.clone(), &FaucetConfig::default());
    faucet.fund(who, Amount::from_tokens(20)).unwrap();
    assert!(faucet.claim(who, &mut reject).is_err());
    assert_eq!(faucet.last_claim_at(who), None);
    assert_eq!(faucet.balance(), Amount::from_tokens(20));
    assert!(faucet.journal().of_kind("CLAIMED").is_empty());
    assert!(faucet.claim(who, &mut Wallets::new()).is_ok());

    let mut vault = AllowanceVault::new(clock, Ownership::new(who));
    vault.fund(who, Amount::new(10)).unwrap();
    vault.set_allowance(who, who, Amount::new(4)).unwrap();
    assert!(vault.withdraw(who, Amount::new(4), &mut reject).is_err());
    assert_eq!(vault.allowance(who), Amount::new(4));
    assert!(vault.ledger().verify_solvency().is_ok());

    assert_eq!(reject.attempts(), 3);
}

/// Writes a payout into the engine's journal during the handoff, then
/// refuses the value.
struct JournalForger {
    outcome: Option<Result<u64>>,
}

impl<C: Custodian> ValueTransfer<C> for JournalForger {
    fn transfer(
        &mut self,
        custodian: &mut C,
        to: AccountId,
        _amount: Amount,
    ) -> std::result::Result<(), TransferRejected> {
        let forged = CustodyEvent::Settled {
            account: to,
            amount: Amount::new(1_000_000),
        };
        self.outcome = Some(custodian.core_mut().record(Timestamp(0), forged));
        Err(TransferRejected::new("recipient reverted"))
    }
}

#[test]
fn rejected_transfer_leaves_no_forged_journal_entry() {
    let (_, clock) = clock_at(0);
    let mut donations = DonationBox::new(clock);
    let who = AccountId::new();
    donations.deposit(who, Amount::new(5)).unwrap();

    let mut forger = JournalForger { outcome: None };
    assert!(matches!(
        donations.withdraw(who, &mut forger),
        Err(CustodyError::TransferRejected { .. })
    ));
    assert_eq!(forger.outcome, Some(Err(CustodyError::ReentrantCall)));
    assert!(donations.journal().of_kind("SETTLED").is_empty());
    assert_eq!(donations.journal().len(), 1);
    assert_eq!(donations.balance_of(who), Amount::new(5));
    assert_eq!(donations.custody(), Amount::new(5));
    donations.journal().verify_chain().unwrap();
}
