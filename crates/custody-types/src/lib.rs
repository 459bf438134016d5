//! # custody-types
//!
//! Shared types, errors, and configuration for the **custody** engine.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`EscrowId`], [`BountyId`]
//! - **Value**: [`Amount`], a checked non-negative integer
//! - **Time**: [`Timestamp`], the [`Clock`] interface, [`SystemClock`], [`ManualClock`]
//! - **Authorization**: the [`AuthorizationOracle`] interface
//! - **Workflow states**: [`EscrowState`], [`BountyState`]
//! - **Observations**: [`CustodyEvent`]
//! - **Configuration**: [`CustodyConfig`], [`FaucetConfig`], [`BountyConfig`], [`ApprovalRule`]
//! - **Errors**: [`CustodyError`] with `CU_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod amount;
pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod state;
pub mod time;

pub use amount::*;
pub use auth::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use state::*;
pub use time::*;

// Constants are accessed via `custody_types::constants::FOO`
// (not re-exported to avoid name collisions).
