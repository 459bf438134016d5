//! Rate limit: fixed payout, per-claimant cooldown.
//!
//! A claim is payable if the claimant never claimed, or if
//! `now − last_claim ≥ cooldown`. The claim instant is recorded as part
//! of the settlement effects, before the handoff.

use std::collections::HashMap;

use custody_ledger::Ledger;
use custody_types::{AccountId, Amount, CustodyError, FaucetConfig, Result, Timestamp};

use crate::policy::{ClaimRequest, Policy};

#[derive(Debug, Clone)]
pub struct RateLimit {
    max_claim: Amount,
    cooldown_secs: u64,
    last_claim: HashMap<AccountId, Timestamp>,
}

impl RateLimit {
    #[must_use]
    pub fn new(max_claim: Amount, cooldown_secs: u64) -> Self {
        Self {
            max_claim,
            cooldown_secs,
            last_claim: HashMap::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &FaucetConfig) -> Self {
        Self::new(config.max_claim, config.cooldown_secs)
    }

    #[must_use]
    pub fn max_claim(&self) -> Amount {
        self.max_claim
    }

    #[must_use]
    pub fn cooldown_secs(&self) -> u64 {
        self.cooldown_secs
    }

    #[must_use]
    pub fn last_claim_at(&self, account: AccountId) -> Option<Timestamp> {
        self.last_claim.get(&account).copied()
    }

    /// Earliest instant `account` may claim again (`None`: right away).
    #[must_use]
    pub fn next_claim_at(&self, account: AccountId) -> Option<Timestamp> {
        self.last_claim_at(account)
            .map(|last| last.plus_secs(self.cooldown_secs))
    }
}

impl Policy for RateLimit {
    type Checkpoint = (AccountId, Option<Timestamp>);

    fn claimable(&self, ledger: &Ledger, request: &ClaimRequest) -> Result<Amount> {
        if let Some(available_at) = self.next_claim_at(request.account) {
            if request.now < available_at {
                return Err(CustodyError::CooldownActive { available_at });
            }
        }
        let pool = ledger.unallocated();
        if pool < self.max_claim {
            return Err(CustodyError::InsufficientFaucetFunds {
                needed: self.max_claim,
                available: pool,
            });
        }
        Ok(self.max_claim)
    }

    fn checkpoint(&self, account: AccountId) -> Self::Checkpoint {
        (account, self.last_claim_at(account))
    }

    fn on_settled(
        &mut self,
        ledger: &mut Ledger,
        request: &ClaimRequest,
        amount: Amount,
    ) -> Result<()> {
        ledger.debit_unallocated(amount)?;
        self.last_claim.insert(request.account, request.now);
        Ok(())
    }

    fn rollback(&mut self, (account, prior): Self::Checkpoint) {
        match prior {
            Some(at) => {
                self.last_claim.insert(account, at);
            }
            None => {
                self.last_claim.remove(&account);
            }
        }
    }
}
