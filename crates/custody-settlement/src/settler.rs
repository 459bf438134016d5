//! The settlement primitive.
//!
//! The only path by which value leaves a correct engine:
//!
//! ```text
//!   1. guard.enter()                      ── ReentrantCall if busy
//!   2. claim = policy.claimable(request)  ── gate errors surface as-is
//!   3. claim == 0                         ── NoClaim
//!   4. checkpoint ledger + policy
//!      policy.on_settled(claim)           ── claim retired
//!      ledger.release(claim)              ── custody reduced
//!   5. transfer(engine, account, claim)   ── control leaves the engine
//!   6. rejected → restore checkpoints     ── TransferRejected
//!   7. journal Settled(account, claim)
//!   8. guard.exit()                       ── on every path
//! ```
//!
//! Step 4 strictly precedes step 5. Anything the handoff does with the
//! engine it is given sees the claim already gone, and any attempt to
//! mutate custody hits the guard.

use custody_ledger::LedgerCheckpoint;
use custody_types::{Amount, CustodyError, CustodyEvent, Result};
use tracing::{debug, info, warn};

use crate::engine::Custodian;
use crate::policy::{ClaimRequest, Policy};
use crate::transfer::ValueTransfer;

/// Pay out `request` through `custodian`'s policy and hand the value to
/// `transfer`. Returns the amount paid.
///
/// On any error the engine is exactly as it was before the call.
pub fn settle<C: Custodian>(
    custodian: &mut C,
    request: ClaimRequest,
    transfer: &mut dyn ValueTransfer<C>,
) -> Result<Amount> {
    custodian.core_mut().guard.enter()?;
    let outcome = settle_guarded(custodian, &request, transfer);
    custodian.core_mut().guard.exit();
    outcome
}

fn settle_guarded<C: Custodian>(
    custodian: &mut C,
    request: &ClaimRequest,
    transfer: &mut dyn ValueTransfer<C>,
) -> Result<Amount> {
    let (claim, ledger_cp, policy_cp) = apply_effects(custodian, request)?;

    debug!(account = %request.account, claim = %claim, "handing off settlement");
    if let Err(rejected) = transfer.transfer(custodian, request.account, claim) {
        let core = custodian.core_mut();
        core.ledger.restore(ledger_cp);
        core.policy.rollback(policy_cp);
        warn!(
            account = %request.account,
            claim = %claim,
            reason = %rejected,
            "transfer rejected, settlement rolled back"
        );
        return Err(CustodyError::TransferRejected {
            reason: rejected.reason,
        });
    }

    let core = custodian.core_mut();
    core.journal.record(
        request.now,
        CustodyEvent::Settled {
            account: request.account,
            amount: claim,
        },
    );
    info!(account = %request.account, amount = %claim, "settled");
    Ok(claim)
}

type Effects<P> = (Amount, LedgerCheckpoint, <P as Policy>::Checkpoint);

/// Steps 2–4. Either all effects apply or none do.
fn apply_effects<C: Custodian>(
    custodian: &mut C,
    request: &ClaimRequest,
) -> Result<Effects<C::Policy>> {
    let core = custodian.core_mut();
    let claim = core.policy.claimable(&core.ledger, request)?;
    if claim.is_zero() {
        return Err(CustodyError::NoClaim);
    }

    let ledger_cp = core.ledger.checkpoint(request.account);
    let policy_cp = core.policy.checkpoint(request.account);
    let applied = core
        .policy
        .on_settled(&mut core.ledger, request, claim)
        .and_then(|()| core.ledger.release(claim));
    match applied {
        Ok(()) => Ok((claim, ledger_cp, policy_cp)),
        Err(err) => {
            core.ledger.restore(ledger_cp);
            core.policy.rollback(policy_cp);
            Err(err)
        }
    }
}
