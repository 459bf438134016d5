//! Donation box, in two builds.
//!
//! Accounts deposit and later withdraw their whole balance.
//!
//! - [`DonationBox`] pays through [`settle`]: the balance is retired and
//!   the guard held before value leaves.
//! - [`VulnerableDonationBox`] is the broken ordering kept as a reference
//!   for tests: it hands value out first and clears the balance after,
//!   with no guard. A recipient that calls back in during the handoff
//!   drains every other depositor.
//!
//! Both implement [`Donations`] so the same recipient code can be aimed
//! at either.

use std::sync::Arc;

use custody_ledger::{EventJournal, Ledger};
use custody_settlement::{ClaimRequest, Custodian, CustodyCore, PullPayment, ValueTransfer, settle};
use custody_types::{AccountId, Amount, Clock, CustodyError, CustodyEvent, Result};
use tracing::{debug, warn};

/// Deposit/withdraw surface shared by both builds.
pub trait Donations: Sized {
    /// Credit `amount` to `from`.
    fn deposit(&mut self, from: AccountId, amount: Amount) -> Result<()>;

    /// Pay `caller` its whole balance through `transfer`.
    fn withdraw(
        &mut self,
        caller: AccountId,
        transfer: &mut dyn ValueTransfer<Self>,
    ) -> Result<Amount>;

    fn ledger(&self) -> &Ledger;

    fn balance_of(&self, account: AccountId) -> Amount {
        self.ledger().balance_of(account)
    }

    /// Value actually held.
    fn custody(&self) -> Amount {
        self.ledger().custody()
    }

    /// Value owed to depositors.
    fn total_balances(&self) -> Amount {
        self.ledger().total_owed()
    }
}

// ---------------------------------------------------------------------------
// Guarded build
// ---------------------------------------------------------------------------

pub struct DonationBox {
    core: CustodyCore<PullPayment>,
    clock: Arc<dyn Clock>,
}

impl DonationBox {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            core: CustodyCore::new(PullPayment),
            clock,
        }
    }

    /// Value sent without a deposit call. Held, owed to nobody.
    pub fn receive(&mut self, from: AccountId, amount: Amount) -> Result<()> {
        self.core.ledger_mut()?.receive(amount)?;
        self.core
            .record(self.clock.now(), CustodyEvent::Deposited { from, amount })?;
        Ok(())
    }

    #[must_use]
    pub fn journal(&self) -> &EventJournal {
        self.core.journal()
    }
}

impl Donations for DonationBox {
    fn deposit(&mut self, from: AccountId, amount: Amount) -> Result<()> {
        self.core.ledger_mut()?.credit(from, amount)?;
        self.core
            .record(self.clock.now(), CustodyEvent::Deposited { from, amount })?;
        debug!(from = %from, amount = %amount, "donation");
        Ok(())
    }

    fn withdraw(
        &mut self,
        caller: AccountId,
        transfer: &mut dyn ValueTransfer<Self>,
    ) -> Result<Amount> {
        let request = ClaimRequest::full(caller, self.clock.now());
        settle(self, request, transfer)
    }

    fn ledger(&self) -> &Ledger {
        self.core.ledger()
    }
}

impl Custodian for DonationBox {
    type Policy = PullPayment;

    fn core(&self) -> &CustodyCore<PullPayment> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CustodyCore<PullPayment> {
        &mut self.core
    }
}

// ---------------------------------------------------------------------------
// Unguarded build
// ---------------------------------------------------------------------------

/// Interaction before effects, no guard. Do not use outside tests.
pub struct VulnerableDonationBox {
    ledger: Ledger,
    journal: EventJournal,
    clock: Arc<dyn Clock>,
}

impl VulnerableDonationBox {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: Ledger::new(),
            journal: EventJournal::new(),
            clock,
        }
    }

    pub fn receive(&mut self, from: AccountId, amount: Amount) -> Result<()> {
        self.ledger.receive(amount)?;
        self.journal
            .record(self.clock.now(), CustodyEvent::Deposited { from, amount });
        Ok(())
    }

    #[must_use]
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }
}

impl Donations for VulnerableDonationBox {
    fn deposit(&mut self, from: AccountId, amount: Amount) -> Result<()> {
        self.ledger.credit(from, amount)?;
        self.journal
            .record(self.clock.now(), CustodyEvent::Deposited { from, amount });
        Ok(())
    }

    fn withdraw(
        &mut self,
        caller: AccountId,
        transfer: &mut dyn ValueTransfer<Self>,
    ) -> Result<Amount> {
        let owed = self.ledger.balance_of(caller);
        if owed.is_zero() {
            return Err(CustodyError::NoClaim);
        }
        let checkpoint = self.ledger.checkpoint(caller);
        self.ledger.release(owed)?;

        // The balance is still on the books while the recipient runs.
        if let Err(rejected) = transfer.transfer(self, caller, owed) {
            self.ledger.restore(checkpoint);
            return Err(CustodyError::TransferRejected {
                reason: rejected.reason,
            });
        }
        self.ledger.clear(caller);

        self.journal.record(
            self.clock.now(),
            CustodyEvent::Settled {
                account: caller,
                amount: owed,
            },
        );
        if !self.ledger.is_solvent() {
            warn!(
                custody = %self.ledger.custody(),
                owed = %self.ledger.total_owed(),
                "donation box insolvent"
            );
        }
        Ok(owed)
    }

    fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use custody_settlement::Wallets;
    use custody_types::{ManualClock, Timestamp};

    use super::*;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(ManualClock::new(Timestamp(0)))
    }

    fn plain_round_trip<B: Donations>(mut donations: B) {
        let (a, b) = (AccountId::new(), AccountId::new());
        donations.deposit(a, Amount::new(4)).unwrap();
        donations.deposit(b, Amount::new(6)).unwrap();
        donations.deposit(a, Amount::new(1)).unwrap();
        assert_eq!(donations.balance_of(a), Amount::new(5));
        assert_eq!(donations.custody(), Amount::new(11));

        let mut wallets = Wallets::new();
        assert_eq!(donations.withdraw(a, &mut wallets), Ok(Amount::new(5)));
        assert_eq!(donations.balance_of(a), Amount::ZERO);
        assert_eq!(donations.total_balances(), Amount::new(6));
        assert_eq!(donations.custody(), Amount::new(6));
        assert_eq!(
            donations.withdraw(a, &mut wallets),
            Err(CustodyError::NoClaim)
        );
    }

    #[test]
    fn guarded_box_with_honest_recipient() {
        plain_round_trip(DonationBox::new(clock()));
    }

    #[test]
    fn unguarded_box_with_honest_recipient() {
        plain_round_trip(VulnerableDonationBox::new(clock()));
    }

    #[test]
    fn zero_deposit_rejected() {
        let mut donations = DonationBox::new(clock());
        assert_eq!(
            donations.deposit(AccountId::new(), Amount::ZERO),
            Err(CustodyError::ZeroValue)
        );
    }

    #[test]
    fn direct_receive_is_owed_to_nobody() {
        let mut donations = DonationBox::new(clock());
        let a = AccountId::new();
        donations.receive(a, Amount::new(3)).unwrap();
        assert_eq!(donations.custody(), Amount::new(3));
        assert_eq!(donations.balance_of(a), Amount::ZERO);
        assert!(donations.ledger().verify_solvency().is_ok());
    }
}
