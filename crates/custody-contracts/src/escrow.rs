//! Pull-payment escrow.
//!
//! ```text
//!   create_escrow(buyer, seller, amount)   value locked under the buyer
//!   confirm(buyer, id)                     locked → seller's claim
//!   refund(buyer, id)                      locked → buyer's claim
//!   withdraw_payments(account)             settle the account's claim
//! ```
//!
//! Resolution only moves claims inside the ledger. Value leaves through
//! `withdraw_payments`, which aggregates everything the caller is owed
//! across all escrows.

use std::collections::BTreeMap;
use std::sync::Arc;

use custody_ledger::{EventJournal, Ledger};
use custody_settlement::{
    ClaimRequest, Custodian, CustodyCore, PullPayment, ValueTransfer, settle,
};
use custody_types::{
    AccountId, Amount, Clock, CustodyError, CustodyEvent, EscrowId, EscrowState, Result, Timestamp,
};
use tracing::info;

/// One buyer/seller agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escrow {
    pub id: EscrowId,
    pub buyer: AccountId,
    pub seller: AccountId,
    pub amount: Amount,
    pub state: EscrowState,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

pub struct EscrowBook {
    core: CustodyCore<PullPayment>,
    clock: Arc<dyn Clock>,
    escrows: BTreeMap<EscrowId, Escrow>,
    last_id: EscrowId,
}

impl EscrowBook {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            core: CustodyCore::new(PullPayment),
            clock,
            escrows: BTreeMap::new(),
            last_id: EscrowId(0),
        }
    }

    /// Buyer places `amount` in escrow for `seller`.
    pub fn create_escrow(
        &mut self,
        buyer: AccountId,
        seller: AccountId,
        amount: Amount,
    ) -> Result<EscrowId> {
        self.core.ensure_idle()?;
        if amount.is_zero() {
            return Err(CustodyError::ZeroValue);
        }
        let id = self.last_id.next()?;
        self.core.ledger_mut()?.credit_locked(buyer, amount)?;
        self.last_id = id;
        let now = self.clock.now();
        self.escrows.insert(
            id,
            Escrow {
                id,
                buyer,
                seller,
                amount,
                state: EscrowState::Deposited,
                created_at: now,
                resolved_at: None,
            },
        );
        self.core.record(
            now,
            CustodyEvent::EscrowDeposited {
                id,
                buyer,
                seller,
                amount,
            },
        )?;
        info!(escrow = %id, buyer = %buyer, seller = %seller, amount = %amount, "escrow created");
        Ok(id)
    }

    /// Buyer releases the escrow to the seller.
    pub fn confirm(&mut self, caller: AccountId, id: EscrowId) -> Result<()> {
        self.resolve(caller, id, EscrowState::Confirmed)
    }

    /// Buyer takes the escrow back.
    pub fn refund(&mut self, caller: AccountId, id: EscrowId) -> Result<()> {
        self.resolve(caller, id, EscrowState::Refunded)
    }

    fn resolve(&mut self, caller: AccountId, id: EscrowId, target: EscrowState) -> Result<()> {
        self.core.ensure_idle()?;
        let escrow = *self
            .escrows
            .get(&id)
            .ok_or(CustodyError::EscrowNotFound(id))?;
        if caller != escrow.buyer {
            return Err(CustodyError::Unauthorized);
        }
        if !escrow.state.can_transition_to(target) {
            return Err(CustodyError::InvalidState {
                current: escrow.state.to_string(),
                expected: EscrowState::Deposited.to_string(),
            });
        }

        let (payee, event) = match target {
            EscrowState::Confirmed => (escrow.seller, CustodyEvent::EscrowConfirmed { id }),
            EscrowState::Refunded => (escrow.buyer, CustodyEvent::EscrowRefunded { id }),
            EscrowState::Deposited => {
                return Err(CustodyError::InvalidState {
                    current: escrow.state.to_string(),
                    expected: "confirmed or refunded".to_string(),
                });
            }
        };
        self.core
            .ledger_mut()?
            .transfer_locked(escrow.buyer, payee, escrow.amount)?;

        let now = self.clock.now();
        if let Some(entry) = self.escrows.get_mut(&id) {
            entry.state = target;
            entry.resolved_at = Some(now);
        }
        self.core.record(now, event)?;
        info!(escrow = %id, state = %target, payee = %payee, "escrow resolved");
        Ok(())
    }

    /// Pay the caller everything it is owed across all escrows.
    pub fn withdraw_payments(
        &mut self,
        caller: AccountId,
        transfer: &mut dyn ValueTransfer<Self>,
    ) -> Result<Amount> {
        let request = ClaimRequest::full(caller, self.clock.now());
        settle(self, request, transfer)
    }

    #[must_use]
    pub fn escrow(&self, id: EscrowId) -> Option<&Escrow> {
        self.escrows.get(&id)
    }

    #[must_use]
    pub fn escrow_count(&self) -> usize {
        self.escrows.len()
    }

    /// Claimable by `account` right now.
    #[must_use]
    pub fn payments_of(&self, account: AccountId) -> Amount {
        self.core.ledger().balance_of(account)
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        self.core.ledger()
    }

    #[must_use]
    pub fn journal(&self) -> &EventJournal {
        self.core.journal()
    }
}

impl Custodian for EscrowBook {
    type Policy = PullPayment;

    fn core(&self) -> &CustodyCore<PullPayment> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CustodyCore<PullPayment> {
        &mut self.core
    }
}
