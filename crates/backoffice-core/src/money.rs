//! # Money Module
//!
//! Provides the `Money` type for monetary values and `DiscountRate` for the
//! flat percentage discount applied to a sale.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    5500 × 10% = 550 (exact), discount rounded half-up when fractional   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use backoffice_core::money::{DiscountRate, Money};
//!
//! let price = Money::from_cents(2750);
//! let line = price * 2i64;
//! assert_eq!(line.cents(), 5500);
//!
//! let discounted = line.apply_discount(DiscountRate::from_percent(10));
//! assert_eq!(discounted.cents(), 4950);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Basis points in 100%.
pub const FULL_DISCOUNT_BPS: u32 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: the Calculator tolerates any input, so intermediate
///   values may be negative (e.g. a discount above 100%)
/// - **Single field tuple struct**: serializes as a bare integer
/// - **Saturating arithmetic**: `+`, `-`, `*` and `sum` stop at the `i64`
///   bounds instead of panicking or wrapping
///
/// ## Where Money is Used
/// ```text
/// CatalogItem.unit_price ──► LineEntry.unit_price ──► SaleLineItem.line_total
///                                                              │
///                                      Σ line totals ──► Sale.subtotal
///                                                              │
///                        subtotal − discount + shipping ──► Sale.total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(27, 50).cents(), 2750);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
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
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Money;
    ///
    /// let line_total = Money::from_cents(2750).multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 5500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns the discount amount for the given rate, rounded half-up to the
    /// minor unit.
    ///
    /// Uses i128 so large subtotals never overflow during the multiplication.
    pub fn discount_amount(&self, rate: DiscountRate) -> Money {
        let amount = (self.0 as i128 * rate.bps() as i128 + 5000).div_euclid(10_000);
        Money(amount.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::{DiscountRate, Money};
    ///
    /// let subtotal = Money::from_cents(10000);
    /// let discounted = subtotal.apply_discount(DiscountRate::from_percent(10));
    /// assert_eq!(discounted.cents(), 9000);
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        *self - self.discount_amount(rate)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display is for logs and debugging. User-facing formatting lives in the
/// app configuration (currency symbol, decimals).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
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
// Discount Rate
// =============================================================================

/// Flat discount represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. 1000 bps = 10%. A whole-sale discount entered as
/// `12.5` becomes 1250 bps with no float kept around.
///
/// The type is unsigned, so a negative discount cannot be expressed. Values
/// above 100% are representable; rejecting them is the job of
/// [`validate_discount`](crate::validation::validate_discount).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a rate from a whole percentage (10 = 10%).
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        DiscountRate(pct.saturating_mul(100))
    }

    /// Creates a rate from a fractional percentage, rounded to the nearest
    /// basis point. Negative inputs saturate to zero.
    pub fn from_percentage(pct: f64) -> Self {
        DiscountRate((pct * 100.0).round().max(0.0) as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3i64).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Money::from_cents(i64::MAX / 2);

        assert_eq!(big.multiply_quantity(3).cents(), i64::MAX);
        assert_eq!((big + big + big).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - big).cents(), i64::MIN);

        let revenue: Money = vec![big, big, big].into_iter().sum();
        assert_eq!(revenue.cents(), i64::MAX);

        let discount = Money::from_cents(i64::MAX).discount_amount(DiscountRate::from_bps(u32::MAX));
        assert_eq!(discount.cents(), i64::MAX);
    }

    #[test]
    fn test_discount_amount_rounds_half_up() {
        // 999 × 12.5% = 124.875 → 125
        let amount = Money::from_cents(999).discount_amount(DiscountRate::from_bps(1250));
        assert_eq!(amount.cents(), 125);

        // 5 × 10% = 0.5 → 1
        let amount = Money::from_cents(5).discount_amount(DiscountRate::from_percent(10));
        assert_eq!(amount.cents(), 1);
    }

    #[test]
    fn test_apply_discount() {
        let subtotal = Money::from_cents(5500);
        assert_eq!(subtotal.apply_discount(DiscountRate::from_percent(10)).cents(), 4950);
        assert_eq!(subtotal.apply_discount(DiscountRate::zero()).cents(), 5500);
        assert_eq!(subtotal.apply_discount(DiscountRate::from_percent(100)).cents(), 0);
    }

    #[test]
    fn test_discount_above_full_is_not_clamped() {
        let subtotal = Money::from_cents(1000);
        let result = subtotal.apply_discount(DiscountRate::from_percent(150));
        assert_eq!(result.cents(), -500);
    }

    #[test]
    fn test_discount_rate_constructors() {
        assert_eq!(DiscountRate::from_percent(10).bps(), 1000);
        assert_eq!(DiscountRate::from_percentage(12.5).bps(), 1250);
        assert_eq!(DiscountRate::from_percentage(-3.0).bps(), 0);
        assert_eq!(DiscountRate::from_percent(50_000_000).bps(), u32::MAX);
        assert!((DiscountRate::from_bps(825).percentage() - 8.25).abs() < 0.001);
    }
}
