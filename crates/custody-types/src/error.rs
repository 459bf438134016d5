//! Error types for the custody engine.
//!
//! All errors use the `CU_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Value / balance errors
//! - 2xx: Workflow (state machine) errors
//! - 3xx: Gate errors (allowance, time lock, cooldown)
//! - 4xx: Settlement errors
//! - 5xx: Security errors
//! - 9xx: General / internal errors
//!
//! Every error is terminal for the operation that raised it: the engine
//! is left exactly as it was before the call.

use thiserror::Error;

use crate::{AccountId, Amount, BountyId, EscrowId, Timestamp};

/// Central error enum for all custody operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    // =================================================================
    // Value / Balance Errors (1xx)
    // =================================================================
    /// A deposit, credit, or withdrawal of zero.
    #[error("CU_ERR_100: Zero value")]
    ZeroValue,

    /// Debit beyond the account's claimable balance.
    #[error("CU_ERR_101: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// Unlock or transfer beyond the account's locked balance.
    #[error("CU_ERR_102: Insufficient locked balance: need {needed}, have {available}")]
    InsufficientLocked { needed: Amount, available: Amount },

    /// The custody pool cannot cover the payout.
    #[error("CU_ERR_103: No funds")]
    NoFunds,

    /// Nothing is currently claimable for the caller.
    #[error("CU_ERR_104: No claim")]
    NoClaim,

    /// Checked arithmetic would have wrapped.
    #[error("CU_ERR_105: Amount overflow")]
    Overflow,

    /// The faucet pool cannot cover a full claim.
    #[error("CU_ERR_106: Insufficient faucet funds: need {needed}, have {available}")]
    InsufficientFaucetFunds { needed: Amount, available: Amount },

    // =================================================================
    // Workflow Errors (2xx)
    // =================================================================
    /// The workflow instance is not in a state that allows the operation.
    #[error("CU_ERR_200: Invalid state: expected {expected}, got {current}")]
    InvalidState { current: String, expected: String },

    #[error("CU_ERR_201: Escrow not found: {0}")]
    EscrowNotFound(EscrowId),

    #[error("CU_ERR_202: Bounty not found: {0}")]
    BountyNotFound(BountyId),

    /// Approval requires a prior submission from the hunter.
    #[error("CU_ERR_203: No submission from {hunter} for {bounty}")]
    SubmissionMissing { bounty: BountyId, hunter: AccountId },

    // =================================================================
    // Gate Errors (3xx)
    // =================================================================
    /// Requested more than the beneficiary's remaining allowance.
    #[error("CU_ERR_300: Insufficient allowance: allowed {allowed}, requested {requested}")]
    InsufficientAllowance { allowed: Amount, requested: Amount },

    /// The time gate has not opened yet.
    #[error("CU_ERR_301: Locked until {unlock_at}")]
    Locked { unlock_at: Timestamp },

    /// The claimant must wait for the cooldown to elapse.
    #[error("CU_ERR_302: Cooldown active until {available_at}")]
    CooldownActive { available_at: Timestamp },

    // =================================================================
    // Settlement Errors (4xx)
    // =================================================================
    /// The value handoff reported failure; the settlement was rolled back.
    #[error("CU_ERR_400: Transfer rejected: {reason}")]
    TransferRejected { reason: String },

    /// A custody-mutating call arrived while a settlement was in flight.
    #[error("CU_ERR_401: Reentrant call blocked")]
    ReentrantCall,

    // =================================================================
    // Security Errors (5xx)
    // =================================================================
    /// The caller is not authorized for this operation.
    #[error("CU_ERR_500: Unauthorized")]
    Unauthorized,

    /// Custody no longer covers what is owed. Critical.
    #[error("CU_ERR_501: Solvency violation: {reason}")]
    SolvencyViolation { reason: String },

    /// A journal record's digest does not match its contents.
    #[error("CU_ERR_502: Journal chain broken at sequence {sequence}")]
    JournalTampered { sequence: u64 },

    // =================================================================
    // General Errors (9xx)
    // =================================================================
    #[error("CU_ERR_900: Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("CU_ERR_901: Serialization error: {0}")]
    Serialization(String),

    #[error("CU_ERR_902: I/O error: {0}")]
    Io(String),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, CustodyError>;

impl From<std::io::Error> for CustodyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CustodyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
