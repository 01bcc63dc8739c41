//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  45000 × 1.3 in f64   = 58499.99999999999   ❌ drifts                   │
//! │  45000 × 13000 / 10000 = 58500               ✅ exact                   │
//! │                                                                         │
//! │  Every multiplier (size, tax) is held in basis points and applied with │
//! │  ONE rounding step, so order totals add up to the unit.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brewline_core::money::Money;
//!
//! let price = Money::from_minor(45_000);
//! let large = price.apply_bps(13_000); // ×1.3
//! assert_eq!(large.amount(), 58_500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

/// Basis points in 1.0 (100%).
pub const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// The reference currency has no minor unit, so `Money::from_minor(25_000)`
/// is a 25,000 delivery fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    #[inline]
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the raw amount in the smallest currency unit.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity. `None` on overflow.
    ///
    /// ```rust
    /// use brewline_core::money::Money;
    ///
    /// let line = Money::from_minor(30_000).checked_multiply_quantity(2);
    /// assert_eq!(line, Some(Money::from_minor(60_000)));
    /// assert_eq!(Money::from_minor(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(amount) => Some(Money(amount)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(amount) => Some(Money(amount)),
            None => None,
        }
    }

    /// Adds up amounts, `None` if the total leaves the i64 range.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), Money::checked_add)
    }

    /// Scales by a factor in basis points, rounding half away from zero.
    /// `None` if the result does not fit.
    ///
    /// ## Implementation
    /// `(amount × bps ± 5000) / 10000` in i128, so only the final result
    /// can be out of range.
    pub fn checked_apply_bps(&self, bps: u32) -> Option<Money> {
        let scaled = self.0 as i128 * bps as i128;
        let half = BPS_SCALE / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / BPS_SCALE
        } else {
            (scaled - half) / BPS_SCALE
        };
        i64::try_from(rounded).ok().map(Money)
    }

    /// [`Money::checked_apply_bps`], saturating at the i64 bounds.
    ///
    /// Factors up to 100% (`bps <= 10_000`) never saturate.
    pub fn apply_bps(&self, bps: u32) -> Money {
        self.checked_apply_bps(bps).unwrap_or(if self.0 < 0 {
            Money(i64::MIN)
        } else {
            Money(i64::MAX)
        })
    }

    /// Calculates tax on this amount.
    ///
    /// ```rust
    /// use brewline_core::money::Money;
    /// use brewline_core::types::TaxRate;
    ///
    /// let tax = Money::from_minor(118_500).calculate_tax(TaxRate::from_bps(1_000));
    /// assert_eq!(tax.amount(), 11_850);
    /// ```
    #[inline]
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.apply_bps(rate.bps())
    }

    /// Subtraction clamped at zero, used for change due.
    #[inline]
    pub fn saturating_sub(self, other: Money) -> Money {
        if self > other {
            self - other
        } else {
            Money::zero()
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the amount with thousands separators: `155,350`.
///
/// Currency symbols and decimal places are a presentation concern; see
/// `ShopConfig::format_money` in brewline-store.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            write!(f, "-{grouped}")
        } else {
            write!(f, "{grouped}")
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
