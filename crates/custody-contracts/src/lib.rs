//! # custody-contracts
//!
//! The custody engines. Each owns its own ledger and pays out only through
//! [`custody_settlement::settle`].
//!
//! | Engine | Funds held as | Payout |
//! |--------|---------------|--------|
//! | [`EscrowBook`] | locked under the buyer | seller or buyer claim, pulled |
//! | [`BountyBoard`] | locked under the poster | approved hunter claim, pulled |
//! | [`AllowanceVault`] | shared pool | up to an owner-set ceiling |
//! | [`TimelockVault`] | shared pool | everything, to the owner, after unlock |
//! | [`Faucet`] | shared pool | fixed amount per cooldown |
//! | [`DonationBox`] | per-depositor balance | whole balance, pulled |
//! | [`Treasury`] | shared pool | any amount, to any account, by the owner |
//!
//! [`VulnerableDonationBox`] keeps the unguarded ordering for comparison.

pub mod allowance_vault;
pub mod bounty;
pub mod donation;
pub mod escrow;
pub mod faucet;
pub mod ownership;
pub mod timelock_vault;
pub mod treasury;

pub use allowance_vault::AllowanceVault;
pub use bounty::{Bounty, BountyBoard};
pub use donation::{DonationBox, Donations, VulnerableDonationBox};
pub use escrow::{Escrow, EscrowBook};
pub use faucet::Faucet;
pub use ownership::Ownership;
pub use timelock_vault::TimelockVault;
pub use treasury::Treasury;
