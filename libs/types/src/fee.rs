//! Proportional trading fee
//!
//! The fee is a whole-number percentage of the amount the order creator
//! receives, charged to the filler on top of that amount and rounded down.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::FeeError;
use crate::numeric::Amount;

/// Integer fee percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct FeePercent(u64);

impl FeePercent {
    pub const MAX: u64 = 100;

    pub fn new(percent: u64) -> Result<Self, FeeError> {
        if percent > Self::MAX {
            return Err(FeeError::PercentOutOfRange(percent));
        }
        Ok(Self(percent))
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// `floor(amount * percent / 100)`.
    ///
    /// Split into quotient and remainder so the intermediate product never
    /// exceeds `amount`.
    pub fn fee_for(&self, amount: Amount) -> Amount {
        let pct = u128::from(self.0);
        let units = amount.units();
        let whole = (units / 100) * pct;
        let part = (units % 100) * pct / 100;
        Amount::new(whole + part)
    }
}

impl TryFrom<u64> for FeePercent {
    type Error = FeeError;

    fn try_from(percent: u64) -> Result<Self, Self::Error> {
        Self::new(percent)
    }
}

impl From<FeePercent> for u64 {
    fn from(fee: FeePercent) -> Self {
        fee.0
    }
}

impl fmt::Display for FeePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ten_percent_of_one_token() {
        let fee = FeePercent::new(10).unwrap();
        assert_eq!(fee.fee_for(Amount::ONE_TOKEN).units(), 100_000_000_000_000_000);
    }

    #[test]
    fn test_fee_rounds_down() {
        let fee = FeePercent::new(10).unwrap();
        assert_eq!(fee.fee_for(Amount::new(9)), Amount::ZERO);
        assert_eq!(fee.fee_for(Amount::new(10)), Amount::new(1));
        assert_eq!(fee.fee_for(Amount::new(19)), Amount::new(1));
        assert_eq!(fee.fee_for(Amount::new(20)), Amount::new(2));
    }

    #[test]
    fn test_fee_bounds() {
        assert_eq!(FeePercent::new(0).unwrap().fee_for(Amount::tokens(5)), Amount::ZERO);
        assert_eq!(
            FeePercent::new(100).unwrap().fee_for(Amount::tokens(5)),
            Amount::tokens(5)
        );
    }

    #[test]
    fn test_fee_on_max_amount_does_not_overflow() {
        let fee = FeePercent::new(100).unwrap();
        assert_eq!(fee.fee_for(Amount::MAX), Amount::MAX);
    }

    #[test]
    fn test_percent_out_of_range() {
        assert_eq!(FeePercent::new(101), Err(FeeError::PercentOutOfRange(101)));
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<FeePercent>("10").is_ok());
        assert!(serde_json::from_str::<FeePercent>("250").is_err());
    }

    proptest! {
        /// The split computation equals the naive floor wherever the naive
        /// product fits.
        #[test]
        fn fuzz_fee_matches_naive_floor(units in 0u128..=u128::MAX / 100, pct in 0u64..=100) {
            let fee = FeePercent::new(pct).unwrap().fee_for(Amount::new(units));
            prop_assert_eq!(fee.units(), units * u128::from(pct) / 100);
        }
    }
}
