//! # Line-Item Builder
//!
//! Validates and assembles a sale line from the in-progress entry form.
//!
//! ## Entry Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  User types sku ──► LineEntry::set_sku() ──► catalog hit?               │
//! │                                                │                        │
//! │                      yes: overwrite description + unit price (autofill) │
//! │                      no:  leave fields as typed                         │
//! │                                                                         │
//! │  User clicks "add" ──► build_line(id, &entry, catalog)                  │
//! │                            │                                            │
//! │                            ├── sku and description empty? → Required    │
//! │                            ├── quantity ≤ 0?              → MustBePos.  │
//! │                            ├── unit price < 0?            → OutOfRange  │
//! │                            └── OK → SaleLineItem (+ cost snapshot)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Autofill only touches the entry form. The builder never overwrites what
//! the user typed; it only snapshots the catalog cost.

use serde::{Deserialize, Serialize};

use crate::catalog::{find_item, CatalogProvider};
use crate::money::Money;
use crate::types::{SaleLineItem, MANUAL_SKU};
use crate::validation::{
    validate_line_identity, validate_quantity, validate_sku, validate_unit_price,
    ValidationResult,
};

// =============================================================================
// Line Entry (form state)
// =============================================================================

/// The pending line fields of the sale form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEntry {
    pub sku: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl Default for LineEntry {
    fn default() -> Self {
        LineEntry {
            sku: String::new(),
            description: String::new(),
            quantity: 1,
            unit_price: Money::zero(),
        }
    }
}

impl LineEntry {
    /// A manual entry with no sku.
    pub fn manual(description: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        LineEntry {
            sku: String::new(),
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// Updates the sku field and applies catalog autofill.
    ///
    /// On a case-insensitive catalog hit the description and unit price are
    /// overwritten with the catalog values. On a miss (or an empty sku) the
    /// fields keep whatever the user typed.
    ///
    /// ## Returns
    /// `true` when the catalog filled the fields.
    pub fn set_sku(&mut self, sku: impl Into<String>, catalog: &dyn CatalogProvider) -> bool {
        self.sku = sku.into();

        match find_item(catalog, &self.sku) {
            Some(item) => {
                self.description = item.description;
                self.unit_price = item.unit_price;
                true
            }
            None => false,
        }
    }

    /// Back to an empty form (quantity 1).
    pub fn clear(&mut self) {
        *self = LineEntry::default();
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds a sale line from the entry form.
///
/// ## Arguments
/// * `id` - Unique line id assigned by the caller
/// * `entry` - The pending line fields
/// * `catalog` - Used only for the cost snapshot
///
/// ## Example
/// ```rust
/// use backoffice_core::catalog::InMemoryCatalog;
/// use backoffice_core::line_item::{build_line, LineEntry};
/// use backoffice_core::money::Money;
///
/// let entry = LineEntry::manual("Gift wrap", 1, Money::from_cents(300));
/// let line = build_line("l-1", &entry, &InMemoryCatalog::default()).unwrap();
/// assert_eq!(line.sku, "MANUAL");
/// assert_eq!(line.line_total.cents(), 300);
/// ```
pub fn build_line(
    id: impl Into<String>,
    entry: &LineEntry,
    catalog: &dyn CatalogProvider,
) -> ValidationResult<SaleLineItem> {
    validate_line_identity(&entry.sku, &entry.description)?;
    validate_sku(&entry.sku)?;
    validate_quantity(entry.quantity)?;
    validate_unit_price(entry.unit_price)?;

    let sku = entry.sku.trim();
    let unit_cost = find_item(catalog, sku).and_then(|item| item.unit_cost);

    Ok(SaleLineItem {
        id: id.into(),
        sku: if sku.is_empty() {
            MANUAL_SKU.to_string()
        } else {
            sku.to_string()
        },
        description: entry.description.trim().to_string(),
        quantity: entry.quantity,
        unit_price: entry.unit_price,
        line_total: entry.unit_price.multiply_quantity(entry.quantity),
        unit_cost,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::error::ValidationError;
    use crate::types::{CatalogItem, StockLevel};

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(vec![CatalogItem {
            sku: "SKU123".to_string(),
            description: "Producto A".to_string(),
            unit_price: Money::from_cents(2750),
            on_hand: 12,
            stock_level: StockLevel::Normal,
            unit_cost: Some(Money::from_cents(1800)),
        }])
    }

    #[test]
    fn test_autofill_on_case_insensitive_hit() {
        let mut entry = LineEntry::default();
        assert!(entry.set_sku("sku123", &catalog()));
        assert_eq!(entry.description, "Producto A");
        assert_eq!(entry.unit_price.cents(), 2750);
        assert_eq!(entry.sku, "sku123");
    }

    #[test]
    fn test_autofill_miss_keeps_typed_fields() {
        let mut entry = LineEntry::manual("Hand typed", 2, Money::from_cents(999));
        assert!(!entry.set_sku("NOPE", &catalog()));
        assert_eq!(entry.description, "Hand typed");
        assert_eq!(entry.unit_price.cents(), 999);
    }

    #[test]
    fn test_builder_does_not_overwrite_typed_price() {
        let entry = LineEntry {
            sku: "SKU123".to_string(),
            description: "Discounted A".to_string(),
            quantity: 2,
            unit_price: Money::from_cents(2500),
        };
        let line = build_line("l1", &entry, &catalog()).unwrap();
        assert_eq!(line.description, "Discounted A");
        assert_eq!(line.unit_price.cents(), 2500);
        assert_eq!(line.line_total.cents(), 5000);
        assert_eq!(line.unit_cost, Some(Money::from_cents(1800)));
    }

    #[test]
    fn test_manual_line_uses_sentinel_sku() {
        let entry = LineEntry::manual("Custom grip", 1, Money::from_cents(1200));
        let line = build_line("l2", &entry, &catalog()).unwrap();
        assert_eq!(line.sku, MANUAL_SKU);
        assert!(line.is_manual());
        assert_eq!(line.unit_cost, None);
    }

    #[test]
    fn test_unmatched_sku_is_kept_without_cost() {
        let entry = LineEntry {
            sku: "XYZ-9".to_string(),
            description: "Unlisted".to_string(),
            quantity: 1,
            unit_price: Money::from_cents(100),
        };
        let line = build_line("l3", &entry, &catalog()).unwrap();
        assert_eq!(line.sku, "XYZ-9");
        assert_eq!(line.unit_cost, None);
    }

    #[test]
    fn test_builder_validation() {
        let empty = LineEntry::default();
        assert!(matches!(
            build_line("x", &empty, &catalog()),
            Err(ValidationError::Required { .. })
        ));

        let zero_qty = LineEntry::manual("A", 0, Money::from_cents(100));
        assert!(matches!(
            build_line("x", &zero_qty, &catalog()),
            Err(ValidationError::MustBePositive { .. })
        ));

        let negative = LineEntry::manual("A", 1, Money::from_cents(-1));
        assert!(matches!(
            build_line("x", &negative, &catalog()),
            Err(ValidationError::OutOfRange { .. })
        ));

        let free = LineEntry::manual("Sticker", 3, Money::zero());
        assert!(build_line("x", &free, &catalog()).is_ok());
    }
}
