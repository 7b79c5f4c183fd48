//! Money type for representing monetary values.
//!
//! Amounts are integers in the currency's minor unit (paisa, cents), so
//! "100.50" NPR is stored as 10050. All arithmetic is checked.

use crate::error::{CommerceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    NPR,
    INR,
    USD,
    EUR,
    GBP,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "NPR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::NPR => "NPR",
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol (e.g., "Rs.").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::NPR => "Rs.",
            Currency::INR => "\u{20b9}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "NPR" => Some(Currency::NPR),
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Parse a decimal string such as `"100.50"`.
    ///
    /// ```
    /// use storefront_commerce::money::{Currency, Money};
    /// let price = Money::parse("100.50", Currency::NPR).unwrap();
    /// assert_eq!(price.amount_minor, 10050);
    /// ```
    pub fn parse(input: &str, currency: Currency) -> Result<Self> {
        let invalid = || CommerceError::InvalidAmount(input.to_string());
        let trimmed = input.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        let places = currency.decimal_places() as usize;
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) || fraction.len() > places
        {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| CommerceError::Overflow)?;
        let fraction: i64 = if fraction.is_empty() {
            0
        } else {
            // "5" in a 2-place currency means 50 minor units
            format!("{:0<places$}", fraction).parse().map_err(|_| invalid())?
        };

        let amount = whole
            .checked_mul(currency.minor_per_major())
            .and_then(|m| m.checked_add(fraction))
            .ok_or(CommerceError::Overflow)?;

        Ok(Self::new(if negative { -amount } else { amount }, currency))
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_minor > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Format as a display string (e.g., "Rs.100.50").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "100.50").
    pub fn display_amount(&self) -> String {
        let per_major = self.currency.minor_per_major();
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        let whole = abs / per_major as u64;
        let places = self.currency.decimal_places() as usize;
        if places == 0 {
            format!("{sign}{whole}")
        } else {
            let fraction = abs % per_major as u64;
            format!("{sign}{whole}.{fraction:0places$}")
        }
    }

    /// Add another Money value of the same currency.
    pub fn try_add(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount_minor
            .checked_add(other.amount_minor)
            .ok_or(CommerceError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Subtract another Money value of the same currency.
    pub fn try_subtract(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount_minor
            .checked_sub(other.amount_minor)
            .ok_or(CommerceError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Multiply by a quantity.
    pub fn try_multiply(&self, factor: i64) -> Result<Money> {
        let amount = self
            .amount_minor
            .checked_mul(factor)
            .ok_or(CommerceError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Sum an iterator of Money values. An empty iterator sums to zero.
    pub fn try_sum<'a>(iter: impl IntoIterator<Item = &'a Money>, currency: Currency) -> Result<Money> {
        iter.into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<()> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency,
                got: other.currency,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
