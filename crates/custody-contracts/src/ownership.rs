//! Single-owner access control.
//!
//! The engines gate owner-only operations through [`AuthorizationOracle`]
//! and journal every change this type reports. The owner can hand
//! ownership to another account or renounce it, after which every
//! owner-only operation fails `Unauthorized`.

use custody_types::{AccountId, AuthorizationOracle, CustodyError, CustodyEvent, Result};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Ownership {
    owner: Option<AccountId>,
}

impl Ownership {
    /// `owner` becomes the first owner.
    #[must_use]
    pub fn new(owner: AccountId) -> Self {
        Self { owner: Some(owner) }
    }

    fn only_owner(&self, caller: AccountId) -> Result<AccountId> {
        match self.owner {
            Some(owner) if owner == caller => Ok(owner),
            _ => Err(CustodyError::Unauthorized),
        }
    }

    /// Returns the change for the owning engine's journal.
    pub fn transfer_ownership(
        &mut self,
        caller: AccountId,
        new_owner: AccountId,
    ) -> Result<CustodyEvent> {
        let previous = self.only_owner(caller)?;
        self.owner = Some(new_owner);
        info!(previous = %previous, new = %new_owner, "ownership transferred");
        Ok(CustodyEvent::OwnershipTransferred {
            previous: Some(previous),
            new: Some(new_owner),
        })
    }

    /// Leave the engine without an owner. Irreversible.
    pub fn renounce_ownership(&mut self, caller: AccountId) -> Result<CustodyEvent> {
        let previous = self.only_owner(caller)?;
        self.owner = None;
        info!(previous = %previous, "ownership renounced");
        Ok(CustodyEvent::OwnershipTransferred {
            previous: Some(previous),
            new: None,
        })
    }
}

impl AuthorizationOracle for Ownership {
    fn is_owner(&self, caller: AccountId) -> bool {
        self.owner == Some(caller)
    }

    fn owner(&self) -> Option<AccountId> {
        self.owner
    }
}

/// The journal entry an engine opens with when `authority` is installed.
pub(crate) fn initial_ownership<A: AuthorizationOracle>(authority: &A) -> CustodyEvent {
    CustodyEvent::OwnershipTransferred {
        previous: None,
        new: authority.owner(),
    }
}
