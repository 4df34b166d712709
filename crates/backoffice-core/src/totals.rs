//! # Totals Calculator
//!
//! Pure function turning line items, a discount and a shipping cost into the
//! monetary totals of a sale.
//!
//! ```text
//! subtotal = Σ (quantity_i × unit_price_i)
//! discount = round_half_up(subtotal × bps / 10000)
//! total    = subtotal − discount + shipping
//! ```
//!
//! The calculator never fails and never clamps a discount. Money arithmetic
//! saturates at the `i64` bounds. Range checks on discount and shipping
//! belong to [`crate::validation`] and run before this is called.

use serde::{Deserialize, Serialize};

use crate::money::{DiscountRate, Money};
use crate::types::SaleLineItem;

/// Result of a totals computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub total: Money,
}

/// Computes subtotal and total for a list of lines.
///
/// ## Example
/// ```rust
/// use backoffice_core::money::{DiscountRate, Money};
/// use backoffice_core::totals::calculate_totals;
///
/// let totals = calculate_totals(&[], DiscountRate::from_percent(10), Money::from_cents(500));
/// assert_eq!(totals.subtotal.cents(), 0);
/// assert_eq!(totals.total.cents(), 500);
/// ```
pub fn calculate_totals(items: &[SaleLineItem], discount: DiscountRate, shipping: Money) -> Totals {
    let subtotal = subtotal(items);
    let discount_amount = subtotal.discount_amount(discount);

    Totals {
        subtotal,
        discount_amount,
        total: subtotal - discount_amount + shipping,
    }
}

/// Σ quantity × unit price, recomputed from the lines rather than trusting
/// the stored line totals.
pub fn subtotal(items: &[SaleLineItem]) -> Money {
    items
        .iter()
        .map(|item| item.unit_price.multiply_quantity(item.quantity))
        .sum()
}
