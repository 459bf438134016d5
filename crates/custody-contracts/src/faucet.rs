//! Faucet: a fixed payout per account, at most once per cooldown.

use std::sync::Arc;

use custody_ledger::{EventJournal, Ledger};
use custody_settlement::{ClaimRequest, Custodian, CustodyCore, RateLimit, ValueTransfer, settle};
use custody_types::{AccountId, Amount, Clock, CustodyEvent, FaucetConfig, Result, Timestamp};
use tracing::info;

pub struct Faucet {
    core: CustodyCore<RateLimit>,
    clock: Arc<dyn Clock>,
}

impl Faucet {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: &FaucetConfig) -> Self {
        Self {
            core: CustodyCore::new(RateLimit::from_config(config)),
            clock,
        }
    }

    pub fn fund(&mut self, from: AccountId, amount: Amount) -> Result<()> {
        self.core.ledger_mut()?.receive(amount)?;
        self.core
            .record(self.clock.now(), CustodyEvent::Deposited { from, amount })?;
        Ok(())
    }

    /// Pay the caller `max_claim` if its cooldown has elapsed.
    pub fn claim(
        &mut self,
        caller: AccountId,
        transfer: &mut dyn ValueTransfer<Self>,
    ) -> Result<Amount> {
        let now = self.clock.now();
        let paid = settle(self, ClaimRequest::full(caller, now), transfer)?;
        self.core.record(
            now,
            CustodyEvent::Claimed {
                account: caller,
                amount: paid,
            },
        )?;
        info!(account = %caller, amount = %paid, "faucet claim");
        Ok(paid)
    }

    #[must_use]
    pub fn max_claim(&self) -> Amount {
        self.core.policy().max_claim()
    }

    #[must_use]
    pub fn cooldown_secs(&self) -> u64 {
        self.core.policy().cooldown_secs()
    }

    #[must_use]
    pub fn last_claim_at(&self, account: AccountId) -> Option<Timestamp> {
        self.core.policy().last_claim_at(account)
    }

    #[must_use]
    pub fn balance(&self) -> Amount {
        self.core.ledger().custody()
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

impl Custodian for Faucet {
    type Policy = RateLimit;

    fn core(&self) -> &CustodyCore<RateLimit> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CustodyCore<RateLimit> {
        &mut self.core
    }
}
