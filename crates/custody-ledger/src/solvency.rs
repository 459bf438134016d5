//! Solvency and conservation checks.
//!
//! Two independent invariants are enforced after every settlement:
//! ```text
//! balanced:   custody == Σ owed + unallocated
//! conserved:  custody == Σ inflow − Σ outflow
//! ```
//!
//! `balanced` implies the weaker property every depositor cares about,
//! `custody ≥ Σ owed`. A violation of either means accounting and held
//! value have diverged: the engine that produced it is broken.

use custody_types::{Amount, CustodyError, Result};
use serde::{Deserialize, Serialize};

/// Lifetime value flow through one ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conservation {
    inflow: Amount,
    outflow: Amount,
}

impl Conservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record value entering custody.
    pub fn record_inflow(&mut self, amount: Amount) -> Result<()> {
        self.inflow = self
            .inflow
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        Ok(())
    }

    /// Record value leaving custody.
    pub fn record_outflow(&mut self, amount: Amount) -> Result<()> {
        self.outflow = self
            .outflow
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        Ok(())
    }

    #[must_use]
    pub fn inflow(&self) -> Amount {
        self.inflow
    }

    #[must_use]
    pub fn outflow(&self) -> Amount {
        self.outflow
    }
}

/// Point-in-time snapshot of a ledger's totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvencyReport {
    pub custody: Amount,
    pub available: Amount,
    pub locked: Amount,
    pub unallocated: Amount,
    pub inflow: Amount,
    pub outflow: Amount,
}

impl SolvencyReport {
    /// Everything owed to accounts, claimable or locked.
    #[must_use]
    pub fn owed(&self) -> Amount {
        self.available.saturating_add(self.locked)
    }

    /// `custody ≥ Σ owed`.
    #[must_use]
    pub fn is_solvent(&self) -> bool {
        self.custody >= self.owed()
    }

    /// `custody == Σ owed + unallocated`.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.owed()
            .checked_add(self.unallocated)
            .is_some_and(|expected| expected == self.custody)
    }

    /// `custody == inflow − outflow`.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.inflow
            .checked_sub(self.outflow)
            .is_some_and(|expected| expected == self.custody)
    }

    /// # Errors
    /// Returns [`CustodyError::SolvencyViolation`] describing the first
    /// invariant that fails.
    pub fn verify(&self) -> Result<()> {
        if !self.is_balanced() {
            return Err(CustodyError::SolvencyViolation {
                reason: format!(
                    "custody {} != owed {} + unallocated {}",
                    self.custody,
                    self.owed(),
                    self.unallocated
                ),
            });
        }
        if !self.is_conserved() {
            return Err(CustodyError::SolvencyViolation {
                reason: format!(
                    "custody {} != inflow {} - outflow {}",
                    self.custody, self.inflow, self.outflow
                ),
            });
        }
        Ok(())
    }
}
