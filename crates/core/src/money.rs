//! Currency amounts and tax rates.
//!
//! Amounts are held in minor units (cents) so that line totals and sums are
//! exact. Rounding only happens where a rate is applied, and is always
//! half-up to the cent. On the wire both types travel as plain JSON numbers
//! (`12.99`, `8.25`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Non-negative amount of money in the smallest currency unit (cents).
///
/// Checked arithmetic and parsing never produce an amount above
/// [`Money::MAX`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest accepted amount (999,999,999,999.99). Every amount up to this
    /// bound survives the decimal wire form exactly.
    pub const MAX: Money = Money(99_999_999_999_999);

    /// Trusted constructor; use [`Money::try_from_cents`] for outside input.
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn try_from_cents(cents: u64) -> DomainResult<Self> {
        Self::bounded(cents).ok_or_else(|| {
            DomainError::validation(format!("amount exceeds the maximum of {}", Self::MAX))
        })
    }

    fn bounded(cents: u64) -> Option<Self> {
        (cents <= Self::MAX.0).then_some(Self(cents))
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Parse a decimal amount (e.g. `12.99`), rounding to the nearest cent.
    pub fn from_decimal(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("amount must not be negative"));
        }
        let cents = (amount * 100.0).round();
        if cents > Self::MAX.0 as f64 {
            return Err(DomainError::validation(format!(
                "amount exceeds the maximum of {}",
                Self::MAX
            )));
        }
        Ok(Self(cents as u64))
    }

    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `None` if the sum exceeds [`Money::MAX`].
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).and_then(Self::bounded)
    }

    /// Sum capped at [`Money::MAX`].
    pub fn saturating_add(self, other: Money) -> Money {
        self.checked_add(other).unwrap_or(Self::MAX)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Multiply a unit price by a quantity (exact). `None` above
    /// [`Money::MAX`].
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(u64::from(quantity)).and_then(Self::bounded)
    }

    /// Divide evenly, rounding half-up. Returns zero when `parts` is zero.
    pub fn div_round(self, parts: u64) -> Money {
        if parts == 0 {
            return Money::ZERO;
        }
        let cents = (u128::from(self.0) * 2 + u128::from(parts)) / (u128::from(parts) * 2);
        Money(cents as u64)
    }

    /// Sum an iterator of amounts; `None` if the total exceeds [`Money::MAX`].
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
    }

    /// Render with a fixed currency label, e.g. `LKR 12.99`.
    pub fn display_with_label(self, label: &str) -> String {
        format!("{label} {self}")
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Money::from_decimal(raw).map_err(serde::de::Error::custom)
    }
}

/// Tax rate as a percentage in the range 0–100, with two decimals of precision.
///
/// Stored as basis points (hundredths of a percent): `8.25%` is `825`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaxRate(u32);

impl ValueObject for TaxRate {}

impl TaxRate {
    pub const ZERO: TaxRate = TaxRate(0);

    const MAX_BASIS_POINTS: u32 = 100 * 100;

    pub fn from_basis_points(bp: u32) -> DomainResult<Self> {
        if bp > Self::MAX_BASIS_POINTS {
            return Err(DomainError::validation("tax rate must be between 0 and 100"));
        }
        Ok(Self(bp))
    }

    pub fn from_percent(percent: f64) -> DomainResult<Self> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(DomainError::validation("tax rate must be between 0 and 100"));
        }
        Self::from_basis_points((percent * 100.0).round() as u32)
    }

    pub fn basis_points(self) -> u32 {
        self.0
    }

    pub fn as_percent(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Tax owed on `amount`, rounded half-up to the cent.
    pub fn tax_on(self, amount: Money) -> Money {
        let scaled = u128::from(amount.cents()) * u128::from(self.0);
        let cents = (scaled + 5_000) / 10_000;
        Money::from_cents(cents as u64)
    }
}

impl core::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_percent())
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        TaxRate::from_percent(raw).map_err(serde::de::Error::custom)
    }
}
