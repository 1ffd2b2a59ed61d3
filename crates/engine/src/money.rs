//! Transfer amounts as integer **minor units**.
//!
//! The backend serializes amounts as decimals (sometimes as strings); they
//! are converted to minor units once, at the reconciliation boundary, and
//! every comparison and display after that works on integers. Transfer
//! amounts carry no sign: direction is expressed by source/destination,
//! never by a negative number.

use std::{fmt, str::FromStr};

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Converts a backend decimal into minor units, rounding half away from
    /// zero. The sign is dropped: leg amounts are stored positive and a
    /// negative value on the wire is a backend quirk, not a direction.
    #[must_use]
    pub fn from_decimal(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Self((value.abs() * 100.0).round() as i64)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses user input into minor units.
    ///
    /// Accepts `.` or `,` as the decimal separator and at most two decimals;
    /// rejects empty input, signs and anything non-numeric. Used by the
    /// new-transfer form, which only ever deals in positive amounts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(s.trim().to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let normalized = trimmed.replace(',', ".");
        let (units_str, cents_str) = match normalized.split_once('.') {
            Some((units, cents)) => (units, Some(cents)),
            None => (normalized.as_str(), None),
        };

        if units_str.is_empty() || !units_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let units: i64 = units_str.parse().map_err(|_| invalid())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) if frac.len() <= 2 && frac.bytes().all(|b| b.is_ascii_digit()) => {
                let parsed: i64 = frac.parse().map_err(|_| invalid())?;
                if frac.len() == 1 { parsed * 10 } else { parsed }
            }
            Some(_) => return Err(invalid()),
        };

        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .map(Money)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_decimal_rounds_to_cents() {
        assert_eq!(Money::from_decimal(150.75).minor(), 15075);
        assert_eq!(Money::from_decimal(0.005).minor(), 1);
        assert_eq!(Money::from_decimal(-12.5).minor(), 1250);
        assert_eq!(Money::from_decimal(f64::NAN).minor(), 0);
    }

    #[test]
    fn display_keeps_two_decimals() {
        assert_eq!(Money::from_minor(0).to_string(), "0.00");
        assert_eq!(Money::from_minor(7).to_string(), "0.07");
        assert_eq!(Money::from_minor(15075).to_string(), "150.75");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!(" 2.30 ".parse::<Money>().unwrap().minor(), 230);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!("".parse::<Money>().is_err());
        assert!("-5".parse::<Money>().is_err());
        assert!("12.345".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }
}
