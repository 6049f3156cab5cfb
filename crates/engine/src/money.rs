use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// totals, shares) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing a decimal string rounds half-up to the nearest cent:
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert_eq!("12.345".parse::<MoneyCents>().unwrap().cents(), 1235);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Converts a JSON-style decimal into cents, rounding half-up.
    ///
    /// Goes through the shortest decimal representation of `value` so that
    /// inputs like `1.005` round to `1.01` instead of suffering from binary
    /// representation error.
    pub fn from_decimal(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::Validation("invalid amount".to_string()));
        }
        value.to_string().parse()
    }

    /// Divides the amount in `parts` equal shares, rounding half-up to the
    /// nearest cent. Returns `None` when `parts` is 0.
    #[must_use]
    pub fn split_even(self, parts: usize) -> Option<MoneyCents> {
        if parts == 0 {
            return None;
        }
        let parts = parts as u64;
        let abs = self.0.unsigned_abs();
        let mut share = abs / parts;
        if (abs % parts) * 2 >= parts {
            share += 1;
        }
        let share = share as i64;
        Some(MoneyCents(if self.0 < 0 { -share } else { share }))
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string (`12.34`, `-0.5`) into cents.
    ///
    /// Digits past the second decimal are rounded half-up (away from zero).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::Validation("invalid amount".to_string());
        let overflow = || EngineError::Validation("amount too large".to_string());

        let (negative, rest) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };
        let (units_str, frac_str) = rest.split_once('.').unwrap_or((rest, ""));

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let digit = |idx: usize| -> i64 {
            frac_str
                .as_bytes()
                .get(idx)
                .map_or(0, |b| i64::from(b - b'0'))
        };
        let mut cents = digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            cents += 1;
        }

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        let signed = if negative {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(MoneyCents(signed))
    }
}
