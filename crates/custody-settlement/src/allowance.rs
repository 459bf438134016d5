//! Allowance gate: per-beneficiary spending ceiling over a shared pool.
//!
//! The owner sets a ceiling per beneficiary (overwriting, never adding).
//! A withdrawal above the remaining ceiling is rejected outright, never
//! clamped. A successful withdrawal reduces the ceiling and the pool by
//! exactly the amount paid.

use std::collections::HashMap;

use custody_ledger::Ledger;
use custody_types::{AccountId, Amount, CustodyError, Result};

use crate::policy::{ClaimRequest, Policy};

#[derive(Debug, Clone, Default)]
pub struct AllowancePolicy {
    allowances: HashMap<AccountId, Amount>,
}

impl AllowancePolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `beneficiary`'s ceiling. Authorization is the caller's job.
    pub fn set_allowance(&mut self, beneficiary: AccountId, amount: Amount) {
        self.allowances.insert(beneficiary, amount);
    }

    #[must_use]
    pub fn allowance_of(&self, beneficiary: AccountId) -> Amount {
        self.allowances
            .get(&beneficiary)
            .copied()
            .unwrap_or_default()
    }
}

impl Policy for AllowancePolicy {
    type Checkpoint = (AccountId, Option<Amount>);

    /// Ceiling first, then pool: a request that the allowance forbids is
    /// `InsufficientAllowance` even when the pool is empty.
    fn claimable(&self, ledger: &Ledger, request: &ClaimRequest) -> Result<Amount> {
        let requested = request.requested.unwrap_or_default();
        if requested.is_zero() {
            return Err(CustodyError::ZeroValue);
        }
        let allowed = self.allowance_of(request.account);
        if requested > allowed {
            return Err(CustodyError::InsufficientAllowance { allowed, requested });
        }
        if ledger.unallocated() < requested {
            return Err(CustodyError::NoFunds);
        }
        Ok(requested)
    }

    fn checkpoint(&self, account: AccountId) -> Self::Checkpoint {
        (account, self.allowances.get(&account).copied())
    }

    fn on_settled(
        &mut self,
        ledger: &mut Ledger,
        request: &ClaimRequest,
        amount: Amount,
    ) -> Result<()> {
        let allowed = self.allowance_of(request.account);
        let remaining = allowed
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientAllowance {
                allowed,
                requested: amount,
            })?;
        ledger.debit_unallocated(amount)?;
        self.allowances.insert(request.account, remaining);
        Ok(())
    }

    fn rollback(&mut self, (account, prior): Self::Checkpoint) {
        match prior {
            Some(amount) => {
                self.allowances.insert(account, amount);
            }
            None => {
                self.allowances.remove(&account);
            }
        }
    }
}
