//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel as plain JSON numbers (`"price": 10.5`) because the
//! persisted wishlist and recently viewed lists are shared with readers that
//! expect that shape. Internally they are exact decimals so cart totals never
//! pick up floating point drift.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// A unit price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format with exactly two decimal places (e.g. `"50.00"`).
    #[must_use]
    pub fn to_fixed(&self) -> String {
        format!("{:.2}", self.0.round_dp(2))
    }

    fn non_negative(amount: Decimal) -> Result<Self, rust_decimal::Error> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(rust_decimal::Error::ErrorString(format!(
                "price cannot be negative: {amount}"
            )));
        }
        Ok(Self(amount))
    }
}

impl fmt::Display for Price {
    /// Shortest exact representation (`10`, `10.5`), matching how the
    /// amount appears in JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    /// Parse a decimal amount such as `"19.99"`. Negative amounts are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::non_negative(Decimal::from_str(s.trim())?)
    }
}

impl<'de> Deserialize<'de> for Price {
    /// Accepts a JSON number; negative amounts are rejected like in
    /// [`FromStr`].
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::non_negative(amount).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_serializes_as_number() {
        let price = Price::from_cents(1050);
        assert_eq!(serde_json::to_string(&price).unwrap(), "10.5");
    }

    #[test]
    fn test_price_deserializes_from_integer_and_float() {
        let whole: Price = serde_json::from_str("10").unwrap();
        assert_eq!(whole, Price::from(10));

        let fractional: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(fractional, Price::from_cents(1999));
    }

    #[test]
    fn test_negative_prices_rejected_when_parsing_and_decoding() {
        assert!("-4.5".parse::<Price>().is_err());
        assert!(serde_json::from_str::<Price>("-4.5").is_err());
        assert_eq!(serde_json::from_str::<Price>("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from(10).times(2), Price::from_cents(250).times(3)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(2750));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("19.99".parse::<Price>().unwrap(), Price::from_cents(1999));
        assert!("-1".parse::<Price>().is_err());
        assert!("ten".parse::<Price>().is_err());
    }

    #[test]
    fn test_display_formats() {
        let price = Price::from_cents(5000);
        assert_eq!(price.to_string(), "50");
        assert_eq!(price.to_fixed(), "50.00");
        assert_eq!(Price::from_cents(1999).to_fixed(), "19.99");
    }
}
