//! Allowance vault: a funded pool, owner-set ceilings per beneficiary.

use std::sync::Arc;

use custody_ledger::{EventJournal, Ledger};
use custody_settlement::{
    AllowancePolicy, ClaimRequest, Custodian, CustodyCore, ValueTransfer, settle,
};
use custody_types::{
    AccountId, Amount, AuthorizationOracle, Clock, CustodyError, CustodyEvent, Result,
};
use tracing::info;

use crate::ownership::{Ownership, initial_ownership};

pub struct AllowanceVault<A = Ownership> {
    core: CustodyCore<AllowancePolicy>,
    clock: Arc<dyn Clock>,
    authority: A,
}

impl<A: AuthorizationOracle> AllowanceVault<A> {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, authority: A) -> Self {
        let genesis = initial_ownership(&authority);
        Self {
            core: CustodyCore::with_genesis(AllowancePolicy::new(), clock.now(), genesis),
            clock,
            authority,
        }
    }

    /// Uncredited deposit into the shared pool.
    pub fn fund(&mut self, from: AccountId, amount: Amount) -> Result<()> {
        self.core.ledger_mut()?.receive(amount)?;
        self.core
            .record(self.clock.now(), CustodyEvent::Deposited { from, amount })?;
        Ok(())
    }

    /// Owner overwrites `beneficiary`'s ceiling.
    pub fn set_allowance(
        &mut self,
        caller: AccountId,
        beneficiary: AccountId,
        amount: Amount,
    ) -> Result<()> {
        self.core.ensure_idle()?;
        if !self.authority.is_owner(caller) {
            return Err(CustodyError::Unauthorized);
        }
        self.core.policy_mut()?.set_allowance(beneficiary, amount);
        self.core.record(
            self.clock.now(),
            CustodyEvent::AllowanceSet {
                beneficiary,
                amount,
            },
        )?;
        info!(beneficiary = %beneficiary, amount = %amount, "allowance set");
        Ok(())
    }

    /// Caller withdraws exactly `amount` against its allowance.
    pub fn withdraw(
        &mut self,
        caller: AccountId,
        amount: Amount,
        transfer: &mut dyn ValueTransfer<Self>,
    ) -> Result<Amount> {
        let request = ClaimRequest::exact(caller, amount, self.clock.now());
        settle(self, request, transfer)
    }

    #[must_use]
    pub fn allowance(&self, beneficiary: AccountId) -> Amount {
        self.core.policy().allowance_of(beneficiary)
    }

    /// Value currently held.
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

impl AllowanceVault<Ownership> {
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

impl<A: AuthorizationOracle> Custodian for AllowanceVault<A> {
    type Policy = AllowancePolicy;

    fn core(&self) -> &CustodyCore<AllowancePolicy> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CustodyCore<AllowancePolicy> {
        &mut self.core
    }
}
