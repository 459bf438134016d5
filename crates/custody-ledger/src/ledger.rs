//! Per-account claims over a pooled custody balance.
//!
//! Every mutation validates first and applies second, so a failed call
//! leaves the ledger untouched. Value only leaves custody through
//! [`Ledger::release`], which the settlement primitive calls after the
//! claim has already been retired.

use std::collections::HashMap;

use custody_types::{AccountId, Amount, CustodyError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::solvency::{Conservation, SolvencyReport};

/// Claim state of one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    /// Claimable now.
    pub available: Amount,
    /// Held for a pending workflow; claimable by nobody yet.
    pub locked: Amount,
}

impl BalanceEntry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn total(&self) -> Amount {
        self.available.saturating_add(self.locked)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.available.is_zero() && self.locked.is_zero()
    }
}

/// Everything needed to undo the effects of one settlement on one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerCheckpoint {
    account: AccountId,
    entry: Option<BalanceEntry>,
    custody: Amount,
    unallocated: Amount,
    conservation: Conservation,
}

impl LedgerCheckpoint {
    #[must_use]
    pub fn account(&self) -> AccountId {
        self.account
    }
}

/// The custodial ledger.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: HashMap<AccountId, BalanceEntry>,
    custody: Amount,
    unallocated: Amount,
    conservation: Conservation,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, account: AccountId) -> BalanceEntry {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// Value arrives and is owed to `account` (claimable immediately).
    ///
    /// # Errors
    /// `ZeroValue` on zero, `Overflow` if any total would wrap.
    pub fn credit(&mut self, account: AccountId, amount: Amount) -> Result<()> {
        let mut entry = self.entry(account);
        entry.available = entry
            .available
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        self.take_in(amount)?;
        self.balances.insert(account, entry);
        debug!(account = %account, amount = %amount, "credit");
        Ok(())
    }

    /// Value arrives and is held for a workflow funded by `account`.
    pub fn credit_locked(&mut self, account: AccountId, amount: Amount) -> Result<()> {
        let mut entry = self.entry(account);
        entry.locked = entry
            .locked
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        self.take_in(amount)?;
        self.balances.insert(account, entry);
        debug!(account = %account, amount = %amount, "credit locked");
        Ok(())
    }

    /// Uncredited direct transfer: value arrives and is owed to nobody.
    pub fn receive(&mut self, amount: Amount) -> Result<()> {
        let unallocated = self
            .unallocated
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        self.take_in(amount)?;
        self.unallocated = unallocated;
        debug!(amount = %amount, pool = %self.unallocated, "receive");
        Ok(())
    }

    /// Custody and inflow both grow by `amount`, or neither does.
    fn take_in(&mut self, amount: Amount) -> Result<()> {
        if amount.is_zero() {
            return Err(CustodyError::ZeroValue);
        }
        let custody = self
            .custody
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        let mut conservation = self.conservation;
        conservation.record_inflow(amount)?;
        self.custody = custody;
        self.conservation = conservation;
        Ok(())
    }

    /// Retire part of an account's claim. Custody is untouched: the value
    /// is still held until [`release`](Self::release) hands it out.
    ///
    /// # Errors
    /// `ZeroValue` on zero, `InsufficientBalance` if the claim is smaller.
    pub fn debit(&mut self, account: AccountId, amount: Amount) -> Result<()> {
        if amount.is_zero() {
            return Err(CustodyError::ZeroValue);
        }
        let mut entry = self.entry(account);
        entry.available =
            entry
                .available
                .checked_sub(amount)
                .ok_or(CustodyError::InsufficientBalance {
                    needed: amount,
                    available: entry.available,
                })?;
        self.balances.insert(account, entry);
        debug!(account = %account, amount = %amount, "debit");
        Ok(())
    }

    /// Retire value from the unallocated pool ahead of a pool payout.
    ///
    /// # Errors
    /// `NoFunds` if the pool is smaller than `amount`.
    pub fn debit_unallocated(&mut self, amount: Amount) -> Result<()> {
        if amount.is_zero() {
            return Err(CustodyError::ZeroValue);
        }
        self.unallocated = self
            .unallocated
            .checked_sub(amount)
            .ok_or(CustodyError::NoFunds)?;
        debug!(amount = %amount, pool = %self.unallocated, "debit pool");
        Ok(())
    }

    /// available → locked.
    pub fn lock(&mut self, account: AccountId, amount: Amount) -> Result<()> {
        if amount.is_zero() {
            return Err(CustodyError::ZeroValue);
        }
        let mut entry = self.entry(account);
        entry.available =
            entry
                .available
                .checked_sub(amount)
                .ok_or(CustodyError::InsufficientBalance {
                    needed: amount,
                    available: entry.available,
                })?;
        entry.locked = entry
            .locked
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        self.balances.insert(account, entry);
        Ok(())
    }

    /// locked → available.
    pub fn unlock(&mut self, account: AccountId, amount: Amount) -> Result<()> {
        if amount.is_zero() {
            return Err(CustodyError::ZeroValue);
        }
        let mut entry = self.entry(account);
        entry.locked = entry
            .locked
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientLocked {
                needed: amount,
                available: entry.locked,
            })?;
        entry.available = entry
            .available
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        self.balances.insert(account, entry);
        debug!(account = %account, amount = %amount, "unlock");
        Ok(())
    }

    /// `from.locked` → `to.available`. Resolves a workflow in favour of `to`.
    pub fn transfer_locked(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        if amount.is_zero() {
            return Err(CustodyError::ZeroValue);
        }
        if from == to {
            return self.unlock(from, amount);
        }
        let mut source = self.entry(from);
        let mut target = self.entry(to);
        source.locked = source
            .locked
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientLocked {
                needed: amount,
                available: source.locked,
            })?;
        target.available = target
            .available
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        self.balances.insert(from, source);
        self.balances.insert(to, target);
        debug!(from = %from, to = %to, amount = %amount, "transfer locked");
        Ok(())
    }

    /// Value physically leaves custody.
    ///
    /// # Errors
    /// `NoFunds` if custody holds less than `amount`.
    pub fn release(&mut self, amount: Amount) -> Result<()> {
        let custody = self
            .custody
            .checked_sub(amount)
            .ok_or(CustodyError::NoFunds)?;
        let mut conservation = self.conservation;
        conservation.record_outflow(amount)?;
        self.custody = custody;
        self.conservation = conservation;
        debug!(amount = %amount, custody = %self.custody, "release");
        Ok(())
    }

    /// Zero an account's claimable balance, returning what it was.
    pub fn clear(&mut self, account: AccountId) -> Amount {
        match self.balances.get_mut(&account) {
            Some(entry) => std::mem::take(&mut entry.available),
            None => Amount::ZERO,
        }
    }

    // -----------------------------------------------------------------
    // Rollback
    // -----------------------------------------------------------------

    /// Capture `account`'s entry and the pool totals.
    #[must_use]
    pub fn checkpoint(&self, account: AccountId) -> LedgerCheckpoint {
        LedgerCheckpoint {
            account,
            entry: self.balances.get(&account).copied(),
            custody: self.custody,
            unallocated: self.unallocated,
            conservation: self.conservation,
        }
    }

    /// Put back everything captured by [`checkpoint`](Self::checkpoint).
    ///
    /// Exact only if no other account was touched in between, which the
    /// settlement guard guarantees.
    pub fn restore(&mut self, checkpoint: LedgerCheckpoint) {
        match checkpoint.entry {
            Some(entry) => {
                self.balances.insert(checkpoint.account, entry);
            }
            None => {
                self.balances.remove(&checkpoint.account);
            }
        }
        self.custody = checkpoint.custody;
        self.unallocated = checkpoint.unallocated;
        self.conservation = checkpoint.conservation;
        debug!(account = %checkpoint.account, "ledger restored");
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Claimable balance of `account`.
    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.entry(account).available
    }

    #[must_use]
    pub fn locked_of(&self, account: AccountId) -> Amount {
        self.entry(account).locked
    }

    #[must_use]
    pub fn balance(&self, account: AccountId) -> BalanceEntry {
        self.entry(account)
    }

    /// Total value currently held.
    #[must_use]
    pub fn custody(&self) -> Amount {
        self.custody
    }

    /// Held value owed to nobody.
    #[must_use]
    pub fn unallocated(&self) -> Amount {
        self.unallocated
    }

    /// Σ (available + locked) over all accounts.
    #[must_use]
    pub fn total_owed(&self) -> Amount {
        self.balances
            .values()
            .fold(Amount::ZERO, |acc, e| acc.saturating_add(e.total()))
    }

    /// Number of accounts with a non-zero entry.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.balances.values().filter(|e| !e.is_zero()).count()
    }

    /// Snapshot of all totals.
    #[must_use]
    pub fn audit(&self) -> SolvencyReport {
        let (available, locked) = self
            .balances
            .values()
            .fold((Amount::ZERO, Amount::ZERO), |(a, l), e| {
                (a.saturating_add(e.available), l.saturating_add(e.locked))
            });
        SolvencyReport {
            custody: self.custody,
            available,
            locked,
            unallocated: self.unallocated,
            inflow: self.conservation.inflow(),
            outflow: self.conservation.outflow(),
        }
    }

    /// `custody ≥ Σ owed`.
    #[must_use]
    pub fn is_solvent(&self) -> bool {
        self.custody >= self.total_owed()
    }

    /// # Errors
    /// [`CustodyError::SolvencyViolation`] if either ledger invariant fails.
    pub fn verify_solvency(&self) -> Result<()> {
        let report = self.audit();
        if let Err(err) = report.verify() {
            warn!(
                custody = %report.custody,
                owed = %report.owed(),
                unallocated = %report.unallocated,
                "solvency violation"
            );
            return Err(err);
        }
        Ok(())
    }
}
