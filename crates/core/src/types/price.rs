//! Positive decimal price parsed from user input.
//!
//! Form fields arrive as text. A [`Price`] can only be built through
//! [`Price::parse`] (or [`Price::try_from`] a [`Decimal`]), so an amount that
//! reaches the catalog API is always a finite, strictly positive decimal.
//!
//! On the wire a price is a JSON number, which is what the catalog API
//! expects in its `price` field.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty or whitespace.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a decimal number (got '{0}')")]
    NotANumber(String),
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
}

/// A strictly positive price in the store currency.
///
/// ## Examples
///
/// ```
/// use vitrina_core::Price;
///
/// let price = Price::parse("19.99").unwrap();
/// assert_eq!(price.to_string(), "19.99");
///
/// assert!(Price::parse("").is_err());
/// assert!(Price::parse("abc").is_err());
/// assert!(Price::parse("-5").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Parse a price from user input.
    ///
    /// Leading and trailing whitespace is ignored. Scientific notation is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not a decimal number, or is
    /// not greater than zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(trimmed)
            .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;

        Self::try_from(amount)
    }

    /// Returns the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if amount.is_sign_negative() || amount.is_zero() {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount.normalize()))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Price::parse("19.99").unwrap().to_string(), "19.99");
        assert_eq!(Price::parse(" 5 ").unwrap().to_string(), "5");
        assert_eq!(Price::parse("0.01").unwrap().to_string(), "0.01");
    }

    #[test]
    fn test_parse_trailing_zeros_are_normalized() {
        assert_eq!(Price::parse("10.50").unwrap().to_string(), "10.5");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("   "), Err(PriceError::Empty));
    }

    #[test]
    fn test_parse_not_a_number() {
        assert!(matches!(
            Price::parse("twenty"),
            Err(PriceError::NotANumber(_))
        ));
        assert!(matches!(
            Price::parse("19,99"),
            Err(PriceError::NotANumber(_))
        ));
    }

    #[test]
    fn test_parse_not_positive() {
        assert_eq!(Price::parse("0"), Err(PriceError::NotPositive));
        assert_eq!(Price::parse("-3.5"), Err(PriceError::NotPositive));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let price = Price::parse("19.99").unwrap();
        let value = serde_json::to_value(price).unwrap();
        assert!(value.is_number());
        assert_eq!(value, serde_json::json!(19.99));
    }
}
