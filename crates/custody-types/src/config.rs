//! Configuration types for the custody engines.
//!
//! Configuration is plain serde data with defaults taken from
//! [`constants`]. It can be built in code or loaded from a JSON file:
//!
//! ```json
//! {
//!   "faucet": { "max_claim": "10000000000000000000", "cooldown_secs": 86400 },
//!   "bounty": { "approval": "require_submission" }
//! }
//! ```
//!
//! Amounts are written as decimal strings so they survive JSON tooling
//! that cannot represent 128-bit integers.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Amount, CustodyError, Result, constants};

/// Rate-limit (faucet) settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaucetConfig {
    /// Fixed payout per successful claim.
    #[serde(with = "amount_string")]
    pub max_claim: Amount,
    /// Minimum seconds between two claims by the same account.
    pub cooldown_secs: u64,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            max_claim: Amount::from_tokens(constants::DEFAULT_FAUCET_MAX_CLAIM_TOKENS),
            cooldown_secs: constants::DEFAULT_FAUCET_COOLDOWN_SECS,
        }
    }
}

/// Precondition for approving a bounty hunter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalRule {
    /// The hunter must have submitted a solution to this bounty.
    #[default]
    RequireSubmission,
    /// The poster may approve any account.
    AnyAccount,
}

/// Bounty board settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyConfig {
    #[serde(default)]
    pub approval: ApprovalRule,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyConfig {
    #[serde(default)]
    pub faucet: FaucetConfig,
    #[serde(default)]
    pub bounty: BountyConfig,
}

impl CustodyConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject settings that would make an engine unusable.
    pub fn validate(&self) -> Result<()> {
        if self.faucet.max_claim.is_zero() {
            return Err(CustodyError::Configuration {
                reason: "faucet.max_claim must be positive".into(),
            });
        }
        if self.faucet.cooldown_secs == 0 {
            return Err(CustodyError::Configuration {
                reason: "faucet.cooldown_secs must be positive".into(),
            });
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

mod amount_string {
    use super::{Amount, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Amount, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Amount, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse::<u128>()
            .map(Amount::new)
            .map_err(serde::de::Error::custom)
    }
}
