//! Type-safe money representation using decimal arithmetic.
//!
//! The store document is single-currency (BRL), so `Money` is a thin
//! wrapper around `rust_decimal::Decimal` whose `Display` produces the
//! storefront format: `R$ ` prefix, two decimal digits, comma as the
//! decimal separator, no thousands separator.

use std::iter::Sum;
use std::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of money in BRL.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from a count of centavos.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Whether the amount is strictly less than zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // "18.50" -> "R$ 18,50"
        let fixed = format!("{:.2}", self.0);
        write!(f, "R$ {}", fixed.replace('.', ","))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_comma_and_two_digits() {
        assert_eq!(Money::from_cents(1850).to_string(), "R$ 18,50");
        assert_eq!(Money::from_cents(800).to_string(), "R$ 8,00");
        assert_eq!(Money::ZERO.to_string(), "R$ 0,00");
    }

    #[test]
    fn test_display_has_no_thousands_separator() {
        assert_eq!(Money::from_cents(123_456_78).to_string(), "R$ 123456,78");
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let line = Money::from_cents(1850) * 3;
        assert_eq!(line, Money::from_cents(5550));

        let total = Money::from_cents(1850) + Money::from_cents(500);
        assert_eq!(total, Money::from_cents(2350));
    }

    #[test]
    fn test_sum_of_lines() {
        let total: Money = [Money::from_cents(1850), Money::from_cents(800)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(2650));
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::from_cents(1).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }
}
