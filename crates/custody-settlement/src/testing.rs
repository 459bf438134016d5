//! Transfer doubles for tests (`test-helpers` feature).

use custody_types::{AccountId, Amount, Result};

use crate::transfer::{TransferRejected, ValueTransfer, Wallets};

/// Refuses every transfer.
#[derive(Debug, Clone)]
pub struct RejectingTransfer {
    reason: String,
    attempts: usize,
}

impl RejectingTransfer {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            attempts: 0,
        }
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl<C: ?Sized> ValueTransfer<C> for RejectingTransfer {
    fn transfer(
        &mut self,
        _custodian: &mut C,
        _to: AccountId,
        _amount: Amount,
    ) -> std::result::Result<(), TransferRejected> {
        self.attempts += 1;
        Err(TransferRejected::new(self.reason.clone()))
    }
}

/// Accepts the value, but first calls back into the engine once per
/// handoff and records what the engine answered.
pub struct ReentrantRecipient<F> {
    hook: F,
    wallets: Wallets,
    outcomes: Vec<Result<()>>,
}

impl<F> ReentrantRecipient<F> {
    pub fn new(hook: F) -> Self {
        Self {
            hook,
            wallets: Wallets::new(),
            outcomes: Vec::new(),
        }
    }

    /// Result of each nested call, in order.
    #[must_use]
    pub fn outcomes(&self) -> &[Result<()>] {
        &self.outcomes
    }

    #[must_use]
    pub fn wallets(&self) -> &Wallets {
        &self.wallets
    }
}

impl<C, F> ValueTransfer<C> for ReentrantRecipient<F>
where
    F: FnMut(&mut C) -> Result<()>,
{
    fn transfer(
        &mut self,
        custodian: &mut C,
        to: AccountId,
        amount: Amount,
    ) -> std::result::Result<(), TransferRejected> {
        let outcome = (self.hook)(custodian);
        self.outcomes.push(outcome);
        self.wallets.deposit(to, amount)
    }
}
