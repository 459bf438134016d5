//! The state every custody engine carries, and the trait that exposes it
//! to [`settle`](crate::settle).

use custody_ledger::{EventJournal, Ledger};
use custody_types::{CustodyEvent, Result, Timestamp};

use crate::guard::ReentrancyGuard;
use crate::policy::Policy;

/// Ledger, gating policy, guard, and journal of one engine.
///
/// Mutable access to the ledger and policy is only handed out while no
/// settlement is in flight.
#[derive(Debug, Clone)]
pub struct CustodyCore<P> {
    pub(crate) ledger: Ledger,
    pub(crate) policy: P,
    pub(crate) guard: ReentrancyGuard,
    pub(crate) journal: EventJournal,
}

impl<P: Policy> CustodyCore<P> {
    #[must_use]
    pub fn new(policy: P) -> Self {
        Self {
            ledger: Ledger::new(),
            policy,
            guard: ReentrancyGuard::new(),
            journal: EventJournal::new(),
        }
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[must_use]
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    #[must_use]
    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }

    /// # Errors
    /// [`ReentrantCall`](custody_types::CustodyError::ReentrantCall) during a
    /// settlement handoff.
    pub fn ensure_idle(&self) -> Result<()> {
        self.guard.ensure_idle()
    }

    pub fn ledger_mut(&mut self) -> Result<&mut Ledger> {
        self.guard.ensure_idle()?;
        Ok(&mut self.ledger)
    }

    pub fn policy_mut(&mut self) -> Result<&mut P> {
        self.guard.ensure_idle()?;
        Ok(&mut self.policy)
    }

    /// A core whose journal opens with `event`, for transitions applied at
    /// construction (initial ownership).
    #[must_use]
    pub fn with_genesis(policy: P, at: Timestamp, event: CustodyEvent) -> Self {
        let mut core = Self::new(policy);
        core.journal.record(at, event);
        core
    }

    /// Append an observation for a transition that has been applied.
    ///
    /// # Errors
    /// [`ReentrantCall`](custody_types::CustodyError::ReentrantCall) during a
    /// settlement handoff. Only [`settle`](crate::settle) journals while the
    /// guard is held.
    pub fn record(&mut self, at: Timestamp, event: CustodyEvent) -> Result<u64> {
        self.guard.ensure_idle()?;
        Ok(self.journal.record(at, event))
    }
}

/// An engine that pays claims through [`settle`](crate::settle).
pub trait Custodian {
    type Policy: Policy;

    fn core(&self) -> &CustodyCore<Self::Policy>;

    fn core_mut(&mut self) -> &mut CustodyCore<Self::Policy>;
}
