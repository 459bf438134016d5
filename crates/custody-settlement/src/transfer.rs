//! The value handoff: the single point where control leaves the engine.
//!
//! An implementation receives the engine itself, mutably, together with
//! the payee and the amount. It may run arbitrary code, including calls
//! back into the engine, before it reports success or failure. By the
//! time it runs, the claim it is paying has already been retired.

use std::collections::HashMap;

use custody_types::{AccountId, Amount};
use thiserror::Error;

/// The receiving side refused the value. Nothing moved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct TransferRejected {
    pub reason: String,
}

impl TransferRejected {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Moves custodied value to an external party.
///
/// `C` is the engine performing the payout.
pub trait ValueTransfer<C: ?Sized> {
    fn transfer(
        &mut self,
        custodian: &mut C,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), TransferRejected>;
}

/// External balances that simply accept whatever they are sent.
#[derive(Debug, Clone, Default)]
pub struct Wallets {
    received: HashMap<AccountId, Amount>,
}

impl Wallets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything `account` has been paid so far.
    #[must_use]
    pub fn received(&self, account: AccountId) -> Amount {
        self.received.get(&account).copied().unwrap_or_default()
    }

    /// Total paid out to all accounts.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.received
            .values()
            .fold(Amount::ZERO, |acc, v| acc.saturating_add(*v))
    }

    /// Accept `amount` for `to` without involving any engine.
    pub fn deposit(&mut self, to: AccountId, amount: Amount) -> Result<(), TransferRejected> {
        let slot = self.received.entry(to).or_default();
        *slot = slot
            .checked_add(amount)
            .ok_or_else(|| TransferRejected::new("wallet balance overflow"))?;
        Ok(())
    }
}

impl<C: ?Sized> ValueTransfer<C> for Wallets {
    fn transfer(
        &mut self,
        _custodian: &mut C,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), TransferRejected> {
        self.deposit(to, amount)
    }
}
