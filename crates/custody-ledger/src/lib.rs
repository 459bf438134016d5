//! # custody-ledger
//!
//! The accounting core: who is owed what, how much value is held, and an
//! append-only record of everything that happened.
//!
//! ## Model
//!
//! ```text
//!   custody  ==  Σ (available + locked)  +  unallocated
//!   custody  ==  inflow − outflow
//! ```
//!
//! - **available**: claimable now by the account
//! - **locked**: placed in custody by the account for a pending workflow
//!   (escrow, bounty), claimable by nobody until the workflow resolves
//! - **unallocated**: held but owed to no one (direct pool funding);
//!   pool-backed gates pay out of it
//!
//! Both equalities hold at every operation boundary of a correct engine.
//! [`Ledger::audit`] produces a [`SolvencyReport`] that checks them.

pub mod journal;
pub mod ledger;
pub mod solvency;

pub use journal::{EventJournal, EventRecord, verify_records};
pub use ledger::{BalanceEntry, Ledger, LedgerCheckpoint};
pub use solvency::{Conservation, SolvencyReport};
