//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: integer rupiah                                       │
//! │  The rupiah has no circulating subunit, so one i64 per amount is    │
//! │  exact. Tax splits round half-up once, explicitly, in one place.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::new(10_000); // Rp10.000
//! let total = price * 3;          // Rp30.000
//! assert_eq!(total.amount(), 30_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole Indonesian rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: refunds contribute negatively to aggregates
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde**: serializes as a plain JSON number, so the
///   persisted blobs stay shaped like `{"price": 10000}`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn new(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// let unit_price = Money::new(10_000);
    /// assert_eq!(unit_price.multiply_quantity(3).amount(), 30_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Tax added **on top** of this amount (exclusive mode).
    ///
    /// Formula: `amount × rate / 100`, in basis points with half-up
    /// rounding: `(amount × bps + 5000) / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::money::Money;
    /// use kasir_core::types::TaxRate;
    ///
    /// // Rp10.000 at 11% exclusive → Rp1.100 added at checkout
    /// let tax = Money::new(10_000).exclusive_tax(TaxRate::from_bps(1100));
    /// assert_eq!(tax.amount(), 1_100);
    /// ```
    pub fn exclusive_tax(&self, rate: TaxRate) -> Money {
        // i128 to prevent overflow on large amounts
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money(tax as i64)
    }

    /// The tax share already **embedded** in this amount (inclusive mode).
    ///
    /// Displayed prices contain the tax, so the share is
    /// `amount × rate / (100 + rate)`; in basis points:
    /// `amount × bps / (10000 + bps)`, rounded half-up. This amount is
    /// informational only and never added to a total.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::money::Money;
    /// use kasir_core::types::TaxRate;
    ///
    /// // Rp10.000 at 11% inclusive → Rp991 of the price is tax
    /// let tax = Money::new(10_000).inclusive_tax(TaxRate::from_bps(1100));
    /// assert_eq!(tax.amount(), 991);
    /// ```
    pub fn inclusive_tax(&self, rate: TaxRate) -> Money {
        let denom = 10000i128 + rate.bps() as i128;
        let tax = (self.0 as i128 * rate.bps() as i128 + denom / 2) / denom;
        Money(tax as i64)
    }

    /// Applies a percentage discount and returns the discount amount.
    ///
    /// ## Arguments
    /// * `percent` - whole percent points (10 = 10%)
    pub fn percentage_of(&self, percent: i64) -> Money {
        let amount = (self.0 as i128 * percent as i128 + 50) / 100;
        Money(amount as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money as `Rp12.345` with dot separators.
///
/// ## Note
/// This is for receipts, logs, and error messages. Any UI does its own
/// localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        write!(f, "{}Rp{}", sign, grouped)
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Summing line totals is the hot path of every report.
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let money = Money::new(10_000);
        assert_eq!(money.amount(), 10_000);
        assert!(money.is_positive());
        assert!(Money::zero().is_zero());
        assert!(Money::new(-500).is_negative());
        assert_eq!(Money::new(-500).abs().amount(), 500);
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(format!("{}", Money::new(0)), "Rp0");
        assert_eq!(format!("{}", Money::new(500)), "Rp500");
        assert_eq!(format!("{}", Money::new(10_000)), "Rp10.000");
        assert_eq!(format!("{}", Money::new(1_234_567)), "Rp1.234.567");
        assert_eq!(format!("{}", Money::new(-30_000)), "-Rp30.000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(10_000);
        let b = Money::new(2_500);

        assert_eq!((a + b).amount(), 12_500);
        assert_eq!((a - b).amount(), 7_500);
        assert_eq!((a * 3).amount(), 30_000);
        assert_eq!(a.multiply_quantity(4).amount(), 40_000);

        let mut acc = Money::zero();
        acc += a;
        acc -= b;
        assert_eq!(acc.amount(), 7_500);
    }

    #[test]
    fn test_exclusive_tax() {
        // Rp10.000 at 11% = Rp1.100 added on top
        let tax = Money::new(10_000).exclusive_tax(TaxRate::from_bps(1100));
        assert_eq!(tax.amount(), 1_100);
    }

    #[test]
    fn test_inclusive_tax() {
        // Rp10.000 at 11% inclusive: 10000 × 11 / 111 = 990.99… → 991
        let tax = Money::new(10_000).inclusive_tax(TaxRate::from_bps(1100));
        assert_eq!(tax.amount(), 991);
    }

    #[test]
    fn test_inclusive_tax_reconstructs_base() {
        // base + embedded tax should stay within a rupiah of the price
        let price = Money::new(55_000);
        let rate = TaxRate::from_bps(1100);
        let tax = price.inclusive_tax(rate);
        let base = price - tax;
        let recomputed = base.exclusive_tax(rate);
        assert!((recomputed.amount() - tax.amount()).abs() <= 1);
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(Money::new(30_000).percentage_of(10).amount(), 3_000);
        // 15% of 333: 49.95 → rounds to 50
        assert_eq!(Money::new(333).percentage_of(15).amount(), 50);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Money::new(10_000)).unwrap();
        assert_eq!(json, "10000");
        let back: Money = serde_json::from_str("10000").unwrap();
        assert_eq!(back, Money::new(10_000));
    }
}
