//! Fixed-point token amounts.
//!
//! Amounts are stored as integer raw units (u64) to avoid floating-point
//! errors. One token equals 10^7 raw units, matching the ledger's 7-digit
//! precision. Decimal strings exist only at the API boundary: parsed on the
//! way in, formatted on the way out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use thiserror::Error;

/// Number of fractional decimal digits the ledger supports.
pub const DECIMALS: u32 = 7;

/// Raw units per whole token.
pub const SCALE: u64 = 10_000_000;

/// Errors from parsing a decimal amount string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,

    #[error("amount contains an invalid character")]
    InvalidCharacter,

    #[error("amount has more than {DECIMALS} fractional digits")]
    TooManyDecimals,

    #[error("amount is too large")]
    Overflow,
}

/// A token amount in raw units (1 token = 10^7 raw).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenAmount(u64);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Parse a decimal string (`"10.5"`, `"0.0000001"`, `"3"`).
    ///
    /// Accepts `digits[.digits]` with at most 7 fractional digits. Signs,
    /// exponents, and a leading `.` are rejected.
    pub fn parse(s: &str) -> Result<Self, AmountParseError> {
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };

        if int_part.is_empty() {
            return Err(AmountParseError::Empty);
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AmountParseError::InvalidCharacter);
        }
        if frac_part.len() > DECIMALS as usize {
            return Err(AmountParseError::TooManyDecimals);
        }

        let whole: u64 = int_part
            .parse()
            .map_err(|_| AmountParseError::Overflow)?;

        let mut frac: u64 = 0;
        if !frac_part.is_empty() {
            frac = frac_part
                .parse()
                .map_err(|_| AmountParseError::Overflow)?;
            frac *= 10u64.pow(DECIMALS - frac_part.len() as u32);
        }

        whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or(AmountParseError::Overflow)
    }
}

impl Add for TokenAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TokenAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / SCALE;
        let frac = self.0 % SCALE;
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac:07}");
            write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
        }
    }
}

impl TryFrom<String> for TokenAmount {
    type Error = AmountParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TokenAmount> for String {
    fn from(a: TokenAmount) -> String {
        a.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_and_fractional() {
        assert_eq!(TokenAmount::parse("10.5").unwrap().raw(), 105_000_000);
        assert_eq!(TokenAmount::parse("0").unwrap(), TokenAmount::ZERO);
        assert_eq!(TokenAmount::parse("1.5").unwrap().raw(), 15_000_000);
        assert_eq!(TokenAmount::parse("0.0000001").unwrap().raw(), 1);
    }

    #[test]
    fn trailing_dot_parses_as_whole() {
        assert_eq!(TokenAmount::parse("5.").unwrap().raw(), 5 * SCALE);
    }

    #[test]
    fn negative_rejected() {
        assert_eq!(
            TokenAmount::parse("-5"),
            Err(AmountParseError::InvalidCharacter)
        );
    }

    #[test]
    fn leading_dot_rejected() {
        assert_eq!(TokenAmount::parse(".5"), Err(AmountParseError::Empty));
    }

    #[test]
    fn garbage_rejected() {
        assert_eq!(
            TokenAmount::parse("abc"),
            Err(AmountParseError::InvalidCharacter)
        );
        assert_eq!(
            TokenAmount::parse("1e5"),
            Err(AmountParseError::InvalidCharacter)
        );
        assert_eq!(TokenAmount::parse(""), Err(AmountParseError::Empty));
    }

    #[test]
    fn eighth_decimal_rejected() {
        assert_eq!(
            TokenAmount::parse("1.12345678"),
            Err(AmountParseError::TooManyDecimals)
        );
    }

    #[test]
    fn overflow_rejected() {
        assert_eq!(
            TokenAmount::parse("99999999999999999999"),
            Err(AmountParseError::Overflow)
        );
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(TokenAmount::parse("10.5").unwrap().to_string(), "10.5");
        assert_eq!(TokenAmount::parse("3").unwrap().to_string(), "3");
        assert_eq!(TokenAmount::from_raw(1).to_string(), "0.0000001");
        assert_eq!(TokenAmount::ZERO.to_string(), "0");
    }

    #[test]
    fn checked_arithmetic() {
        let a = TokenAmount::from_raw(u64::MAX);
        assert!(a.checked_add(TokenAmount::from_raw(1)).is_none());
        assert_eq!(
            TokenAmount::from_raw(5).checked_sub(TokenAmount::from_raw(7)),
            None
        );
        assert_eq!(
            TokenAmount::from_raw(5).saturating_sub(TokenAmount::from_raw(7)),
            TokenAmount::ZERO
        );
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let a = TokenAmount::parse("12.25").unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"12.25\"");
        let back: TokenAmount = serde_json::from_str("\"12.25\"").unwrap();
        assert_eq!(back, a);
    }
}
