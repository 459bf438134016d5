//! Time gate: the whole pool becomes payable at a fixed instant.
//!
//! There is a single claimant (decided by the engine, not the policy);
//! the claim is the entire unallocated pool.

use custody_ledger::Ledger;
use custody_types::{AccountId, Amount, CustodyError, Result, Timestamp};

use crate::policy::{ClaimRequest, Policy};

#[derive(Debug, Clone, Copy)]
pub struct TimeGate {
    unlock_at: Timestamp,
}

impl TimeGate {
    #[must_use]
    pub fn new(unlock_at: Timestamp) -> Self {
        Self { unlock_at }
    }

    #[must_use]
    pub fn unlock_at(&self) -> Timestamp {
        self.unlock_at
    }

    #[must_use]
    pub fn is_open(&self, now: Timestamp) -> bool {
        now >= self.unlock_at
    }
}

impl Policy for TimeGate {
    type Checkpoint = ();

    fn claimable(&self, ledger: &Ledger, request: &ClaimRequest) -> Result<Amount> {
        if !self.is_open(request.now) {
            return Err(CustodyError::Locked {
                unlock_at: self.unlock_at,
            });
        }
        let pool = ledger.unallocated();
        if pool.is_zero() {
            return Err(CustodyError::NoFunds);
        }
        Ok(pool)
    }

    fn checkpoint(&self, _account: AccountId) {}

    fn on_settled(
        &mut self,
        ledger: &mut Ledger,
        _request: &ClaimRequest,
        amount: Amount,
    ) -> Result<()> {
        ledger.debit_unallocated(amount)
    }

    fn rollback(&mut self, (): ()) {}
}
