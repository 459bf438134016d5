//! System-wide constants for the custody engine.

/// Base units per whole token (18 decimal places).
pub const UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Default faucet payout per claim, in whole tokens.
pub const DEFAULT_FAUCET_MAX_CLAIM_TOKENS: u128 = 10;

/// Default faucet cooldown between claims by the same account (24 hours).
pub const DEFAULT_FAUCET_COOLDOWN_SECS: u64 = 86_400;

/// Domain separator mixed into every journal digest.
pub const JOURNAL_DOMAIN_TAG: &[u8] = b"custody-journal-v1";

/// Digest that precedes the first journal record.
pub const JOURNAL_GENESIS_DIGEST: [u8; 32] = [0u8; 32];
