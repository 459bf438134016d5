//! Pull payment: an account withdraws everything it is owed.
//!
//! Used by the state-machine engines (escrow, bounty board) and the
//! donation box. Their workflows move value into an account's claimable
//! balance; this policy pays that balance out in one call.

use custody_ledger::Ledger;
use custody_types::{AccountId, Amount, Result};

use crate::policy::{ClaimRequest, Policy};

#[derive(Debug, Clone, Copy, Default)]
pub struct PullPayment;

impl Policy for PullPayment {
    type Checkpoint = ();

    fn claimable(&self, ledger: &Ledger, request: &ClaimRequest) -> Result<Amount> {
        Ok(ledger.balance_of(request.account))
    }

    fn checkpoint(&self, _account: AccountId) {}

    fn on_settled(
        &mut self,
        ledger: &mut Ledger,
        request: &ClaimRequest,
        amount: Amount,
    ) -> Result<()> {
        ledger.debit(request.account, amount)
    }

    fn rollback(&mut self, (): ()) {}
}
