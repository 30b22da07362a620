//! Core value types for Quill transactions.
//!
//! Small and `Copy` on purpose: these sit on the validation hot path and
//! should never allocate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{AMOUNT_DECIMALS, AMOUNT_SCALE};

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Discriminant written in the first four bytes of every encoded
/// transaction.
///
/// The numeric tags are part of the wire format and are shared with
/// variants that live outside this crate, which is why the one variant we
/// implement is not numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Opaque payload tagged with a service number.
    Arbitrary,
}

impl TransactionType {
    /// Wire tag for this type.
    pub const fn tag(self) -> u32 {
        match self {
            Self::Arbitrary => 10,
        }
    }

    /// Look up a type by its wire tag.
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            10 => Some(Self::Arbitrary),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arbitrary => write!(f, "Arbitrary"),
        }
    }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// Errors from parsing a decimal amount string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("invalid amount syntax: {0:?}")]
    InvalidSyntax(String),

    #[error("amount has more than {max} fractional digits: {input:?}")]
    TooPrecise { input: String, max: u32 },

    #[error("amount out of range: {0:?}")]
    OutOfRange(String),
}

/// A fixed-point amount with exactly eight fractional digits.
///
/// Stored as a signed count of 10^-8 units. `Amount::from_units(100)` is
/// `0.00000100`. No floating point anywhere near money: every fee and
/// balance operation is integer arithmetic, so applying and reverting a
/// transaction restores a balance bit for bit.
///
/// Signed because the involvement report expresses a fee as a negative
/// amount, and because the wire format carries a two's-complement integer.
///
/// # Examples
///
/// ```
/// use quill_protocol::transaction::types::Amount;
///
/// let fee: Amount = "0.00000100".parse().unwrap();
/// assert_eq!(fee.units(), 100);
/// assert_eq!(fee.to_string(), "0.00000100");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from raw 10^-8 units.
    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    /// Create an amount of whole coins, or `None` on overflow.
    pub fn from_coins(coins: i64) -> Option<Self> {
        coins.checked_mul(AMOUNT_SCALE).map(Self)
    }

    /// Raw 10^-8 units.
    pub const fn units(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is strictly greater than zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// `None` for `i64::MIN`, which has no positive counterpart.
    pub fn checked_neg(self) -> Option<Amount> {
        self.0.checked_neg().map(Amount)
    }

    /// Big-endian two's-complement wire form.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Inverse of [`to_be_bytes`](Self::to_be_bytes).
    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(i64::from_be_bytes(bytes))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let scale = AMOUNT_SCALE as u64;
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            magnitude / scale,
            magnitude % scale,
            width = AMOUNT_DECIMALS as usize
        )
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parse a decimal string such as `"10"`, `"-0.5"`, or `"9.99999900"`.
    ///
    /// Rejects more than eight fractional digits instead of rounding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || AmountError::InvalidSyntax(s.to_string());
        let range = || AmountError::OutOfRange(s.to_string());

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, frac) = match body.split_once('.') {
            Some((w, f)) => (w, f),
            None => (body, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(syntax());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(syntax());
        }
        if frac.len() > AMOUNT_DECIMALS as usize {
            return Err(AmountError::TooPrecise {
                input: s.to_string(),
                max: AMOUNT_DECIMALS,
            });
        }

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|_| range())?
        };
        let frac_units: i64 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac, width = AMOUNT_DECIMALS as usize);
            padded.parse::<i64>().map_err(|_| syntax())?
        };

        // Negative values are built downwards so that i64::MIN parses.
        let units = whole_units
            .checked_mul(AMOUNT_SCALE)
            .and_then(|w| {
                if negative {
                    w.checked_neg()?.checked_sub(frac_units)
                } else {
                    w.checked_add(frac_units)
                }
            })
            .ok_or_else(range)?;

        Ok(Amount(units))
    }
}

impl Serialize for Amount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_tags() {
        assert_eq!(TransactionType::Arbitrary.tag(), 10);
        assert_eq!(TransactionType::from_tag(10), Some(TransactionType::Arbitrary));
        assert_eq!(TransactionType::from_tag(2), None);
        assert_eq!(TransactionType::Arbitrary.to_string(), "Arbitrary");
    }

    #[test]
    fn amount_display() {
        assert_eq!(Amount::from_units(100).to_string(), "0.00000100");
        assert_eq!(Amount::from_units(999_999_900).to_string(), "9.99999900");
        assert_eq!(Amount::from_units(-100).to_string(), "-0.00000100");
        assert_eq!(Amount::ZERO.to_string(), "0.00000000");
        assert_eq!(
            Amount::from_units(i64::MIN).to_string(),
            "-92233720368.54775808"
        );
    }

    #[test]
    fn amount_parse() {
        assert_eq!("10".parse::<Amount>().unwrap(), Amount::from_coins(10).unwrap());
        assert_eq!("10.00000000".parse::<Amount>().unwrap().units(), 1_000_000_000);
        assert_eq!("0.000001".parse::<Amount>().unwrap().units(), 100);
        assert_eq!(".5".parse::<Amount>().unwrap().units(), 50_000_000);
        assert_eq!("-1.5".parse::<Amount>().unwrap().units(), -150_000_000);
        assert_eq!("+2".parse::<Amount>().unwrap().units(), 200_000_000);
    }

    #[test]
    fn amount_parse_rejects_precision_loss() {
        assert!(matches!(
            "0.000000001".parse::<Amount>(),
            Err(AmountError::TooPrecise { .. })
        ));
    }

    #[test]
    fn amount_parse_rejects_garbage() {
        for bad in ["", "-", ".", "1.2.3", "abc", "1e8", "1,5", " 1"] {
            assert!(bad.parse::<Amount>().is_err(), "{:?} parsed", bad);
        }
        assert!(matches!(
            "99999999999999999999".parse::<Amount>(),
            Err(AmountError::OutOfRange(_))
        ));
        assert!(matches!(
            "-92233720368.54775809".parse::<Amount>(),
            Err(AmountError::OutOfRange(_))
        ));
    }

    #[test]
    fn amount_display_parse_agree() {
        for units in [0, 1, 100, 123_456_789, -42, i64::MAX, i64::MIN, i64::MIN + 1] {
            let amount = Amount::from_units(units);
            assert_eq!(amount.to_string().parse::<Amount>().unwrap(), amount);
        }
    }

    #[test]
    fn amount_wire_bytes_are_twos_complement() {
        assert_eq!(Amount::from_units(100).to_be_bytes(), [0, 0, 0, 0, 0, 0, 0, 100]);
        assert_eq!(Amount::from_units(-1).to_be_bytes(), [0xFF; 8]);
        assert_eq!(Amount::from_be_bytes([0xFF; 8]).units(), -1);
    }

    #[test]
    fn amount_checked_arithmetic() {
        let ten = Amount::from_coins(10).unwrap();
        let fee = Amount::from_units(100);
        assert_eq!(ten.checked_sub(fee).unwrap().to_string(), "9.99999900");
        assert_eq!(ten.checked_sub(fee).unwrap().checked_add(fee), Some(ten));
        assert_eq!(Amount::from_units(i64::MAX).checked_add(fee), None);
        assert_eq!(fee.checked_neg(), Some(Amount::from_units(-100)));
        assert_eq!(Amount::from_units(i64::MIN).checked_neg(), None);
        assert_eq!(
            Amount::from_units(i64::MIN + 1).checked_neg(),
            Some(Amount::from_units(i64::MAX))
        );
        assert!(fee.is_positive());
        assert!(!Amount::ZERO.is_positive());
    }

    #[test]
    fn amount_serde_as_decimal_string() {
        let fee = Amount::from_units(100);
        let json = serde_json::to_string(&fee).unwrap();
        assert_eq!(json, "\"0.00000100\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fee);
    }
}
