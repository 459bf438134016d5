//! # custody-settlement
//!
//! The settlement primitive and the gating policies built on it.
//!
//! ## Architecture
//!
//! Every engine owns a [`CustodyCore`]: a ledger, one [`Policy`], a
//! [`ReentrancyGuard`], and an event journal. Value leaves the engine only
//! through [`settle`], which:
//! 1. Acquires the guard
//! 2. Asks the policy what is claimable
//! 3. Retires the claim (ledger + policy effects)
//! 4. Hands the value to a [`ValueTransfer`], which may call back in
//! 5. Rolls everything back if the handoff is rejected
//! 6. Journals `Settled` and releases the guard
//!
//! ## Policies
//!
//! - [`PullPayment`]: the account's whole claimable balance
//! - [`AllowancePolicy`]: a caller-chosen amount under a per-account ceiling
//! - [`TimeGate`]: the whole pool, once a fixed instant has passed
//! - [`PoolDraw`]: a caller-chosen amount from the pool, no ceiling
//! - [`RateLimit`]: a fixed amount, at most once per cooldown

pub mod allowance;
pub mod engine;
pub mod guard;
pub mod policy;
pub mod pool_draw;
pub mod pull_payment;
pub mod rate_limit;
pub mod settler;
pub mod time_gate;
pub mod transfer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use allowance::AllowancePolicy;
pub use engine::{Custodian, CustodyCore};
pub use guard::ReentrancyGuard;
pub use policy::{ClaimRequest, Policy};
pub use pool_draw::PoolDraw;
pub use pull_payment::PullPayment;
pub use rate_limit::RateLimit;
pub use settler::settle;
pub use time_gate::TimeGate;
pub use transfer::{TransferRejected, ValueTransfer, Wallets};
