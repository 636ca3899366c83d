//! QOL token amount type.
//!
//! Amounts are represented as fixed-point integers (u128) to avoid floating-point errors.
//! The smallest unit is 1 raw; one whole QOL is [`QOL_UNIT`] raw, matching the six
//! decimals of the token mint. Rewards such as 7.5 QOL are therefore exact.

use crate::QolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Number of decimal places of the QOL token.
pub const QOL_DECIMALS: u32 = 6;

/// Raw units per whole QOL.
pub const QOL_UNIT: u128 = 10u128.pow(QOL_DECIMALS);

/// Basis-point denominator (10_000 bps = 1.0x).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// A QOL token amount.
///
/// Serialized as a decimal string (`"7.5"`) so it survives TOML and JSON without
/// precision loss.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QolAmount(u128);

impl QolAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// An amount of whole tokens.
    pub const fn from_whole(whole: u64) -> Self {
        Self(whole as u128 * QOL_UNIT)
    }

    pub fn raw(&self) -> u128 {
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

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Scale by a multiplier expressed in basis points (15_000 = 1.5x), rounding down.
    pub fn mul_bps(self, bps: u32) -> Self {
        Self(self.0.saturating_mul(bps as u128) / BPS_DENOMINATOR)
    }

    /// Lossy conversion for display and statistics only.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / QOL_UNIT as f64
    }

    /// Decimal rendering without the unit suffix, trailing zeros trimmed.
    pub fn to_decimal_string(&self) -> String {
        let whole = self.0 / QOL_UNIT;
        let frac = self.0 % QOL_UNIT;
        if frac == 0 {
            return whole.to_string();
        }
        let digits = format!("{:0width$}", frac, width = QOL_DECIMALS as usize);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl Add for QolAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for QolAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for QolAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for QolAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} QOL", self.to_decimal_string())
    }
}

impl FromStr for QolAmount {
    type Err = QolError;

    /// Parse a decimal amount such as `"10"`, `"7.5"` or `"0.000001"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QolError::InvalidAmount(s.to_string());
        let trimmed = s.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > QOL_DECIMALS as usize
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_raw: u128 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac, width = QOL_DECIMALS as usize);
            padded.parse().map_err(|_| invalid())?
        };
        whole
            .checked_mul(QOL_UNIT)
            .and_then(|w| w.checked_add(frac_raw))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for QolAmount {
    type Error = QolError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<QolAmount> for String {
    fn from(amount: QolAmount) -> Self {
        amount.to_decimal_string()
    }
}
