//! Fixed-point monetary amounts.
//!
//! Amounts are `u64` counts of minor units (cents). Nothing in the ledger
//! ever touches floating point: `5.1` and `5.10` both parse to 510 cents
//! and both render as `"5.10"`, so signatures over either spelling are
//! bit-identical. Floats only appear at the JSON boundary, because the
//! interchange format says `amount` is a number.
//!
//! Amounts are capped at [`Amount::MAX`] so that every value survives the
//! trip through an `f64` JSON number unchanged.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{AMOUNT_DECIMALS, MAX_MINOR_UNITS, MINOR_UNITS_PER_COIN};
use crate::error::ErrorKind;

/// Reasons an amount failed to parse or compute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount is not a plain decimal number: {0:?}")]
    InvalidFormat(String),

    #[error("amount has more than {AMOUNT_DECIMALS} decimal places: {0:?}")]
    TooPrecise(String),

    #[error("amount must not be negative")]
    Negative,

    #[error("amount overflows the ledger's range")]
    Overflow,
}

impl AmountError {
    /// Every amount problem is a malformed input.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedInput
    }
}

/// A non-negative monetary quantity with exactly two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    /// Zero coins.
    pub const ZERO: Amount = Amount(0);

    /// The largest amount the ledger accepts.
    pub const MAX: Amount = Amount(MAX_MINOR_UNITS);

    /// Wraps a raw count of minor units (cents).
    ///
    /// Unchecked; values above [`Amount::MAX`] fail on checked addition
    /// and refuse to serialize.
    pub const fn from_minor_units(units: u64) -> Self {
        Self(units)
    }

    /// Checked counterpart of [`Amount::from_minor_units`].
    pub fn try_from_minor_units(units: u64) -> Result<Self, AmountError> {
        if units > MAX_MINOR_UNITS {
            return Err(AmountError::Overflow);
        }
        Ok(Self(units))
    }

    /// Whole coins, e.g. `Amount::from_coins(100)` is `100.00`.
    pub fn from_coins(coins: u64) -> Result<Self, AmountError> {
        coins
            .checked_mul(MINOR_UNITS_PER_COIN)
            .ok_or(AmountError::Overflow)
            .and_then(Self::try_from_minor_units)
    }

    /// Raw count of minor units.
    pub const fn minor_units(&self) -> u64 {
        self.0
    }

    /// Returns `true` for `0.00`.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. `None` past [`Amount::MAX`].
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0
            .checked_add(other.0)
            .filter(|sum| *sum <= MAX_MINOR_UNITS)
            .map(Amount)
    }

    /// Checked subtraction. `None` if `other` exceeds `self`.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// The canonical two-decimal text used in signed messages and chain
    /// hashes, e.g. `"0.01"`, `"5.10"`, `"100.00"`.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Conversion for JSON output. Exact in the sense that matters: the
    /// shortest decimal text of the result parses back to the same cents,
    /// for every amount up to [`Amount::MAX`].
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS_PER_COIN as f64
    }

    /// Convert a JSON float via its shortest round-trip decimal text.
    ///
    /// `5.1_f64` prints as `"5.1"`, so it lands on exactly 510 cents. A value
    /// like `0.1 + 0.2` prints as `"0.30000000000000004"` and is rejected as
    /// too precise instead of being silently rounded.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::InvalidFormat(value.to_string()));
        }
        if value < 0.0 {
            return Err(AmountError::Negative);
        }
        value.to_string().parse()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0width$}",
            self.0 / MINOR_UNITS_PER_COIN,
            self.0 % MINOR_UNITS_PER_COIN,
            width = AMOUNT_DECIMALS
        )
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        if s.starts_with('-') {
            return Err(AmountError::Negative);
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(frac) {
            return Err(AmountError::InvalidFormat(s.to_string()));
        }

        // "5.100" is still 5.10; only non-zero digits past the second place matter.
        let frac = frac.trim_end_matches('0');
        if frac.len() > AMOUNT_DECIMALS {
            return Err(AmountError::TooPrecise(s.to_string()));
        }

        let whole: u64 = whole.parse().map_err(|_| AmountError::Overflow)?;
        let mut cents: u64 = 0;
        for (i, digit) in frac.bytes().enumerate() {
            let place = 10u64.pow((AMOUNT_DECIMALS - 1 - i) as u32);
            cents += u64::from(digit - b'0') * place;
        }

        whole
            .checked_mul(MINOR_UNITS_PER_COIN)
            .and_then(|w| w.checked_add(cents))
            .ok_or(AmountError::Overflow)
            .and_then(Amount::try_from_minor_units)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 > MAX_MINOR_UNITS {
            return Err(serde::ser::Error::custom(AmountError::Overflow));
        }
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal amount with at most two decimal places")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Amount::from_coins(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        let v = u64::try_from(v).map_err(|_| E::custom(AmountError::Negative))?;
        self.visit_u64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Amount::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        v.parse().map_err(E::custom)
    }
}
