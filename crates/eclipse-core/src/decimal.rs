//! Fixed-point price type.
//!
//! On-chain prices are stored as `u128` micro-units (six implied decimals).
//! `Price` carries the scaled value as a `rust_decimal::Decimal` so no
//! floating-point rounding creeps into reported prices.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of implied decimals in on-chain price values.
pub const PRICE_DECIMALS: u32 = 6;

/// Price with exact decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Scale a raw on-chain micro-unit value (`raw / 10^6`).
    ///
    /// Returns `None` when `raw` does not fit a 96-bit decimal mantissa.
    pub fn from_micro(raw: u128) -> Option<Self> {
        let raw = i128::try_from(raw).ok()?;
        Decimal::try_from_i128_with_scale(raw, PRICE_DECIMALS)
            .ok()
            .map(|d| Self(d.normalize()))
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_micro_scales_six_decimals() {
        assert_eq!(Price::from_micro(1_035_000), Some(Price::new(dec!(1.035))));
        assert_eq!(Price::from_micro(0), Some(Price::ZERO));
        assert_eq!(Price::from_micro(1), Some(Price::new(dec!(0.000001))));
    }

    #[test]
    fn test_from_micro_rejects_oversized_values() {
        assert_eq!(Price::from_micro(u128::MAX), None);
    }

    #[test]
    fn test_price_serializes_as_string() {
        let json = serde_json::to_string(&Price::new(dec!(1.04))).unwrap();
        assert_eq!(json, "\"1.04\"");
    }
}
