//! Treasury: a pool anyone can pay into, paid out only by the owner.
//!
//! ```text
//!   receive(from, amount)             plain payment     → DEPOSITED
//!   fallback(from, amount, data)      payment + payload → FALLBACK_CALLED
//!   withdraw(owner, to, amount)       any part of the pool, to any account
//! ```
//!
//! The payload of a fallback call is not interpreted; only its length is
//! journaled. A fallback without a payload is a plain `receive`.

use std::sync::Arc;

use custody_ledger::{EventJournal, Ledger};
use custody_settlement::{ClaimRequest, Custodian, CustodyCore, PoolDraw, ValueTransfer, settle};
use custody_types::{
    AccountId, Amount, AuthorizationOracle, Clock, CustodyError, CustodyEvent, Result,
};
use tracing::{debug, info};

use crate::ownership::{Ownership, initial_ownership};

pub struct Treasury<A = Ownership> {
    core: CustodyCore<PoolDraw>,
    clock: Arc<dyn Clock>,
    authority: A,
}

impl<A: AuthorizationOracle> Treasury<A> {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, authority: A) -> Self {
        let genesis = initial_ownership(&authority);
        Self {
            core: CustodyCore::with_genesis(PoolDraw, clock.now(), genesis),
            clock,
            authority,
        }
    }

    pub fn receive(&mut self, from: AccountId, amount: Amount) -> Result<()> {
        self.core.ledger_mut()?.receive(amount)?;
        self.core
            .record(self.clock.now(), CustodyEvent::Deposited { from, amount })?;
        debug!(from = %from, amount = %amount, "treasury deposit");
        Ok(())
    }

    /// A call carrying `data`, with or without value attached.
    pub fn fallback(&mut self, from: AccountId, amount: Amount, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return self.receive(from, amount);
        }
        self.core.ensure_idle()?;
        if !amount.is_zero() {
            self.core.ledger_mut()?.receive(amount)?;
        }
        let data_len = u64::try_from(data.len()).map_err(|_| CustodyError::Overflow)?;
        self.core.record(
            self.clock.now(),
            CustodyEvent::FallbackCalled {
                from,
                amount,
                data_len,
            },
        )?;
        debug!(from = %from, amount = %amount, data_len, "treasury fallback");
        Ok(())
    }

    /// Owner pays `amount` of the pool to `to`.
    pub fn withdraw(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: Amount,
        transfer: &mut dyn ValueTransfer<Self>,
    ) -> Result<Amount> {
        if !self.authority.is_owner(caller) {
            return Err(CustodyError::Unauthorized);
        }
        let paid = settle(self, ClaimRequest::exact(to, amount, self.clock.now()), transfer)?;
        info!(to = %to, amount = %paid, remaining = %self.balance(), "treasury withdrawal");
        Ok(paid)
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

impl Treasury<Ownership> {
    pub fn transfer_ownership(&mut self, caller: AccountId, new_owner: AccountId) -> Result<()> {
        self.core.ensure_idle()?;
        let event = self.authority.transfer_ownership(caller, new_owner)?;
        self.core.record(self.clock.now(), event)?;
        Ok(())
    }

    pub fn renounce_ownership(&mut self, caller: AccountId) -> Result<()> {
        self.core.ensure_idle()?;
        let event = self.authority.renounce_ownership(caller)?;
        self.core.record(self.clock.now(), event)?;
        Ok(())
    }
}

impl<A: AuthorizationOracle> Custodian for Treasury<A> {
    type Policy = PoolDraw;

    fn core(&self) -> &CustodyCore<PoolDraw> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CustodyCore<PoolDraw> {
        &mut self.core
    }
}
