//! Fixed-point amounts
//!
//! An `Amount` counts the smallest indivisible unit of an asset. Both the
//! native currency and exchange tokens use 18 decimal places, so one whole
//! token is `10^18` units. Arithmetic is checked; nothing wraps.

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::errors::AmountError;

/// Decimal places carried by every asset on the exchange.
pub const DECIMALS: u32 = 18;

/// Unsigned quantity of an asset in smallest units.
///
/// Serialized as a decimal string of units, since 128-bit integers do not
/// survive most JSON consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    /// One whole token (or one whole unit of native currency).
    pub const ONE_TOKEN: Amount = Amount(1_000_000_000_000_000_000);
    pub const MAX: Amount = Amount(u128::MAX);

    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    /// Raw unit count
    pub const fn units(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    pub fn checked_mul(self, rhs: u128) -> Option<Amount> {
        self.0.checked_mul(rhs).map(Amount)
    }

    /// Convert a whole-token quantity (e.g. `10`) into units.
    pub fn tokens(whole: u64) -> Amount {
        // u64::MAX * 10^18 < u128::MAX, so this cannot overflow
        Amount(u128::from(whole) * Self::ONE_TOKEN.0)
    }

    /// Convert a human-readable decimal token quantity (e.g. `0.9`) into units.
    ///
    /// Rejects negative values and values with more than 18 decimal places.
    pub fn from_tokens(value: Decimal) -> Result<Amount, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative {
                value: value.to_string(),
            });
        }

        let normalized = value.normalize();
        let scale = normalized.scale();
        if scale > DECIMALS {
            return Err(AmountError::TooPrecise {
                value: value.to_string(),
                max_decimals: DECIMALS,
            });
        }

        normalized
            .mantissa()
            .unsigned_abs()
            .checked_mul(10u128.pow(DECIMALS - scale))
            .map(Amount)
            .ok_or(AmountError::Overflow)
    }

    /// Convert units back into a human-readable decimal token quantity.
    ///
    /// Fails for amounts beyond the 96-bit mantissa of `Decimal`.
    pub fn to_tokens(&self) -> Result<Decimal, AmountError> {
        let out_of_range = || AmountError::OutOfRange {
            value: self.0.to_string(),
        };
        let units = i128::try_from(self.0).map_err(|_| out_of_range())?;
        Decimal::try_from_i128_with_scale(units, DECIMALS)
            .map(|d| d.normalize())
            .map_err(|_| out_of_range())
    }
}

impl From<u128> for Amount {
    fn from(units: u128) -> Self {
        Self(units)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an unsigned integer amount, as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        v.parse::<u128>().map(Amount).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(u128::from(v)))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
