//! Pool draw: a caller-chosen amount straight out of the shared pool.
//!
//! No ceiling and no schedule. Who may draw is decided by the engine
//! before the request reaches [`settle`](crate::settle).

use custody_ledger::Ledger;
use custody_types::{AccountId, Amount, CustodyError, Result};

use crate::policy::{ClaimRequest, Policy};

#[derive(Debug, Clone, Copy, Default)]
pub struct PoolDraw;

impl Policy for PoolDraw {
    type Checkpoint = ();

    fn claimable(&self, ledger: &Ledger, request: &ClaimRequest) -> Result<Amount> {
        let requested = request.requested.unwrap_or_default();
        if requested.is_zero() {
            return Err(CustodyError::ZeroValue);
        }
        if ledger.unallocated() < requested {
            return Err(CustodyError::NoFunds);
        }
        Ok(requested)
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

#[cfg(test)]
mod tests {
    use custody_types::Timestamp;

    use super::*;

    fn draw(units: u128) -> ClaimRequest {
        ClaimRequest::exact(AccountId::dummy(1), Amount::new(units), Timestamp(0))
    }

    #[test]
    fn partial_draw_within_pool() {
        let mut ledger = Ledger::new();
        ledger.receive(Amount::new(10)).unwrap();
        assert_eq!(PoolDraw.claimable(&ledger, &draw(4)), Ok(Amount::new(4)));
        assert_eq!(PoolDraw.claimable(&ledger, &draw(10)), Ok(Amount::new(10)));
    }

    #[test]
    fn overdraw_is_no_funds() {
        let mut ledger = Ledger::new();
        ledger.receive(Amount::new(10)).unwrap();
        assert_eq!(
            PoolDraw.claimable(&ledger, &draw(11)),
            Err(CustodyError::NoFunds)
        );
    }

    #[test]
    fn zero_or_missing_amount_rejected() {
        let ledger = Ledger::new();
        assert_eq!(
            PoolDraw.claimable(&ledger, &draw(0)),
            Err(CustodyError::ZeroValue)
        );
        let full = ClaimRequest::full(AccountId::dummy(1), Timestamp(0));
        assert_eq!(
            PoolDraw.claimable(&ledger, &full),
            Err(CustodyError::ZeroValue)
        );
    }

    #[test]
    fn settled_draw_leaves_the_rest() {
        let mut ledger = Ledger::new();
        ledger.receive(Amount::new(10)).unwrap();
        let mut policy = PoolDraw;
        policy.on_settled(&mut ledger, &draw(4), Amount::new(4)).unwrap();
        assert_eq!(ledger.unallocated(), Amount::new(6));
    }
}
