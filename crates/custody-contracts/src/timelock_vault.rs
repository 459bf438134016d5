//! Time-locked vault: anyone deposits, the owner takes everything once
//! the unlock instant has passed.

use std::sync::Arc;

use custody_ledger::{EventJournal, Ledger};
use custody_settlement::{ClaimRequest, Custodian, CustodyCore, TimeGate, ValueTransfer, settle};
use custody_types::{
    AccountId, Amount, AuthorizationOracle, Clock, CustodyError, CustodyEvent, Result, Timestamp,
};
use tracing::{debug, info};

use crate::ownership::{Ownership, initial_ownership};

pub struct TimelockVault<A = Ownership> {
    core: CustodyCore<TimeGate>,
    clock: Arc<dyn Clock>,
    authority: A,
}

impl<A: AuthorizationOracle> TimelockVault<A> {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, authority: A, unlock_at: Timestamp) -> Self {
        info!(unlock_at = %unlock_at, "time-locked vault created");
        let genesis = initial_ownership(&authority);
        Self {
            core: CustodyCore::with_genesis(TimeGate::new(unlock_at), clock.now(), genesis),
            clock,
            authority,
        }
    }

    pub fn deposit(&mut self, from: AccountId, amount: Amount) -> Result<()> {
        self.core.ledger_mut()?.receive(amount)?;
        self.core
            .record(self.clock.now(), CustodyEvent::Deposited { from, amount })?;
        debug!(from = %from, amount = %amount, "vault deposit");
        Ok(())
    }

    /// Owner withdraws the whole balance.
    pub fn withdraw(
        &mut self,
        caller: AccountId,
        transfer: &mut dyn ValueTransfer<Self>,
    ) -> Result<Amount> {
        if !self.authority.is_owner(caller) {
            return Err(CustodyError::Unauthorized);
        }
        let request = ClaimRequest::full(caller, self.clock.now());
        settle(self, request, transfer)
    }

    #[must_use]
    pub fn unlock_at(&self) -> Timestamp {
        self.core.policy().unlock_at()
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.core.policy().is_open(self.clock.now())
    }

    #[must_use]
    pub fn balance(&self) -> Amount {
        self.core.ledger().custody()
    }

    #[must_use]
    pub fn authority(&self) -> &A {
        &self.authority
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

impl TimelockVault<Ownership> {
    /// Hand the vault to `new_owner`. Journaled.
    pub fn transfer_ownership(&mut self, caller: AccountId, new_owner: AccountId) -> Result<()> {
        self.core.ensure_idle()?;
        let event = self.authority.transfer_ownership(caller, new_owner)?;
        self.core.record(self.clock.now(), event)?;
        Ok(())
    }

    /// Leave the vault without an owner. Journaled.
    pub fn renounce_ownership(&mut self, caller: AccountId) -> Result<()> {
        self.core.ensure_idle()?;
        let event = self.authority.renounce_ownership(caller)?;
        self.core.record(self.clock.now(), event)?;
        Ok(())
    }
}

impl<A: AuthorizationOracle> Custodian for TimelockVault<A> {
    type Policy = TimeGate;

    fn core(&self) -> &CustodyCore<TimeGate> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CustodyCore<TimeGate> {
        &mut self.core
    }
}
