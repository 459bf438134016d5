//! Authorization interface consumed by owner-gated operations.

use crate::AccountId;

/// Yes/no answer to "may `caller` perform an owner-only operation".
///
/// Engines gate on `is_owner`; who the owner is, and how ownership moves,
/// belongs to the implementor. `owner` is read once, when an engine
/// journals the authority it was built with.
pub trait AuthorizationOracle {
    fn is_owner(&self, caller: AccountId) -> bool;

    fn owner(&self) -> Option<AccountId>;
}

/// A fixed single owner.
impl AuthorizationOracle for AccountId {
    fn is_owner(&self, caller: AccountId) -> bool {
        *self == caller
    }

    fn owner(&self) -> Option<AccountId> {
        Some(*self)
    }
}
