//! Non-negative value amounts.
//!
//! Custody never goes negative and never wraps: every arithmetic
//! operation is checked, and callers turn `None` into
//! [`CustodyError::Overflow`](crate::CustodyError::Overflow) or a
//! domain-specific shortfall error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::UNITS_PER_TOKEN;

/// An amount of custodied value in base units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    /// Whole tokens, scaled by [`UNITS_PER_TOKEN`]. Saturates on overflow.
    #[must_use]
    pub const fn from_tokens(tokens: u128) -> Self {
        Self(tokens.saturating_mul(UNITS_PER_TOKEN))
    }

    #[must_use]
    pub const fn units(self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    #[must_use]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Uniform amount in `1..=max` for randomized tests.
    #[cfg(feature = "test-helpers")]
    pub fn random_up_to<R: rand::Rng + ?Sized>(rng: &mut R, max: u128) -> Self {
        Self(rng.gen_range(1..=max.max(1)))
    }
}

impl From<u128> for Amount {
    fn from(units: u128) -> Self {
        Self(units)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero() {
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::new(1).is_zero());
        assert_eq!(Amount::default(), Amount::ZERO);
    }

    #[test]
    fn checked_sub_refuses_negative() {
        assert_eq!(Amount::new(3).checked_sub(Amount::new(4)), None);
        assert_eq!(
            Amount::new(4).checked_sub(Amount::new(3)),
            Some(Amount::new(1))
        );
    }

    #[test]
    fn checked_add_refuses_wrap() {
        assert_eq!(Amount::new(u128::MAX).checked_add(Amount::new(1)), None);
    }

    #[test]
    fn tokens_scale_by_units() {
        assert_eq!(Amount::from_tokens(10).units(), 10 * UNITS_PER_TOKEN);
        assert_eq!(Amount::from_tokens(u128::MAX).units(), u128::MAX);
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&Amount::new(42)).unwrap();
        assert_eq!(json, "42");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Amount::new(42));
    }
}
