//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) so that bucket totals and running
//! balances are exact. Arithmetic saturates at the `i64` bounds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use pocketbook::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Parse a decimal amount such as "12", "12.5", "-12.50", "$12.50" or ".75"
    ///
    /// Whole units are ASCII digits; the fraction, when present, is one or two
    /// digits. Anything else, including amounts beyond the `i64` cent range,
    /// is rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let input = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(input.to_string());

        let (negative, rest) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);

        let (units, fraction) = match rest.split_once('.') {
            Some((units, fraction)) => (units, Some(fraction)),
            None => (rest, None),
        };

        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !digits(units) || (units.is_empty() && fraction.is_none()) {
            return Err(invalid());
        }

        let fraction_cents = match fraction {
            None => 0,
            Some(f) if (1..=2).contains(&f.len()) && digits(f) => {
                let value: i64 = f.parse().map_err(|_| invalid())?;
                if f.len() == 1 {
                    value * 10
                } else {
                    value
                }
            }
            Some(_) => return Err(invalid()),
        };

        let out_of_range = || MoneyParseError::OutOfRange(input.to_string());
        let units: i64 = if units.is_empty() {
            0
        } else {
            // only digits remain, so a failed parse is an overflow
            units.parse().map_err(|_| out_of_range())?
        };
        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(out_of_range)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Sign, whole units and remaining cents of the magnitude
    fn parts(&self) -> (&'static str, u64, u64) {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        (sign, magnitude / 100, magnitude % 100)
    }

    /// Format as a plain decimal ("12.50", "-3.05") for exchange files
    pub fn to_decimal_string(&self) -> String {
        let (sign, units, cents) = self.parts();
        format!("{}{}.{:02}", sign, units, cents)
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let (sign, units, cents) = self.parts();
        format!("{}{}{}.{:02}", sign, symbol, units, cents)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Money amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
