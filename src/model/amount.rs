//! Amount type for monetary values.
//!
//! Amounts travel over the wire as JSON numbers and are displayed the way the tracker's users
//! read Colombian pesos: `$` prefix, `.` as the thousands separator and `,` before the cents,
//! e.g. `$50.000,00`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::str::FromStr;

/// Represents a monetary amount.
///
/// Deserialization is lenient: JSON numbers and numeric strings are parsed, anything else
/// (`null`, booleans, non-numeric text) becomes zero. This keeps a malformed row from the
/// backend from breaking totals computed on the client.
///
/// # Examples
///
/// ```
/// # use expense_tracker::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("50000").unwrap();
/// assert_eq!(amount.to_string(), "$50.000,00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtracts `other`, clamping at the bounds of `Decimal` instead of overflowing.
    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    /// Coerces an arbitrary JSON value into an amount, treating anything non-numeric as zero.
    pub(crate) fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => parse_decimal(&n.to_string())
                .map(Amount)
                .unwrap_or_default(),
            Value::String(s) => Amount::from_str(s).unwrap_or_default(),
            _ => Amount::ZERO,
        }
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s))
}

/// An error that can occur when parsing user input into an `Amount`.
pub struct AmountError {
    input: String,
    source: rust_decimal::Error,
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmountError")
            .field("input", &self.input)
            .field("source", &self.source)
            .finish()
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid amount", self.input)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses a plain decimal number. Surrounding whitespace is ignored and an empty string is
    /// zero, the same way a blank numeric form field is read.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::ZERO);
        }
        parse_decimal(trimmed).map(Amount).map_err(|source| AmountError {
            input: trimmed.to_string(),
            source,
        })
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };
        let grouped = format_num::format_num!(",.2f", self.0.abs().to_f64().unwrap_or_default());
        // es-CO swaps the separators relative to the en-US grouping produced above
        let localized: String = grouped
            .chars()
            .map(|c| match c {
                ',' => '.',
                '.' => ',',
                other => other,
            })
            .collect();
        write!(f, "{sign}${localized}")
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Amount::from_json(&value))
    }
}

/// Totals clamp at the bounds of `Decimal` instead of overflowing.
impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        Amount(iter.fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount.0)))
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sum_saturates() {
        let big = Amount::from_json(&json!(7e28));
        assert_eq!(big.value(), Decimal::from_str("70000000000000000000000000000").unwrap());
        let total: Amount = [big, big].iter().sum();
        assert_eq!(total.value(), Decimal::MAX);
        let negative: Amount = [Amount::new(-big.value()); 2].into_iter().sum();
        assert_eq!(negative.value(), Decimal::MIN);
    }

    #[test]
    fn test_saturating_sub() {
        let big = Amount::new(Decimal::MAX);
        assert_eq!(Amount::new(-big.value()).saturating_sub(big).value(), Decimal::MIN);
        assert_eq!(Amount::from(5).saturating_sub(Amount::from(7)), Amount::from(-2));
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.25").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.25").unwrap());
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  1200  ").unwrap();
        assert_eq!(amount, Amount::from(1200));
    }

    #[test]
    fn test_parse_empty_string_is_zero() {
        assert!(Amount::from_str("").unwrap().is_zero());
        assert!(Amount::from_str("   ").unwrap().is_zero());
    }

    #[test]
    fn test_parse_negative() {
        let amount = Amount::from_str("-75").unwrap();
        assert_eq!(amount, Amount::from(-75));
    }

    #[test]
    fn test_parse_scientific() {
        let amount = Amount::from_str("1e3").unwrap();
        assert_eq!(amount, Amount::from(1000));
    }

    #[test]
    fn test_parse_garbage() {
        let err = Amount::from_str("abc").unwrap_err();
        assert_eq!(err.to_string(), "'abc' is not a valid amount");
    }

    #[test]
    fn test_display_thousands() {
        assert_eq!(Amount::from(50000).to_string(), "$50.000,00");
    }

    #[test]
    fn test_display_millions_with_cents() {
        let amount = Amount::from_str("1234567.5").unwrap();
        assert_eq!(amount.to_string(), "$1.234.567,50");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Amount::from(-1500).to_string(), "-$1.500,00");
    }

    #[test]
    fn test_display_zero() {
        assert_eq!(Amount::ZERO.to_string(), "$0,00");
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_value(Amount::from(50000)).unwrap();
        assert_eq!(json.as_f64(), Some(50000.0));
    }

    #[test]
    fn test_deserialize_number() {
        let amount: Amount = serde_json::from_value(json!(50000.5)).unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50000.5").unwrap());
    }

    #[test]
    fn test_deserialize_numeric_string() {
        let amount: Amount = serde_json::from_value(json!("20")).unwrap();
        assert_eq!(amount, Amount::from(20));
    }

    #[test]
    fn test_deserialize_non_numeric_is_zero() {
        let amount: Amount = serde_json::from_value(json!("twenty")).unwrap();
        assert!(amount.is_zero());
        let amount: Amount = serde_json::from_value(json!(null)).unwrap();
        assert!(amount.is_zero());
        let amount: Amount = serde_json::from_value(json!({"nested": 1})).unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_ordering() {
        assert!(Amount::from(30) < Amount::from(50));
    }
}
