//! # Validation Module
//!
//! Input validation for line entries, sale drafts and client forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (app commands)                                        │
//! │  └── Write permission gate                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Line entry: description or sku, qty > 0, price ≥ 0                │
//! │  ├── Sale draft: client selected, ≥ 1 line, discount ≤ 100%,           │
//! │  │               shipping ≥ 0                                          │
//! │  └── Client form: name required                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL / CHECK constraints                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The totals calculator does not validate; these checks run before it.

use crate::error::ValidationError;
use crate::money::{DiscountRate, Money, FULL_DISCOUNT_BPS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest sku accepted from the entry form.
pub const MAX_SKU_LEN: usize = 50;

/// Longest client name accepted.
pub const MAX_CLIENT_NAME_LEN: usize = 200;

/// Largest quantity accepted on a single line.
pub const MAX_ITEM_QUANTITY: i64 = 99_999;

/// Largest unit price or shipping cost accepted, in minor units.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entered sku. Empty is allowed (manual line).
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    if sku.trim().chars().count() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    Ok(())
}

/// A line needs at least a sku or a description.
pub fn validate_line_identity(sku: &str, description: &str) -> ValidationResult<()> {
    if sku.trim().is_empty() && description.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    Ok(())
}

/// Validates a client name.
///
/// ## Example
/// ```rust
/// use backoffice_core::validation::validate_client_name;
///
/// assert!(validate_client_name("María García").is_ok());
/// assert!(validate_client_name("   ").is_err());
/// ```
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_CLIENT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_CLIENT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates the client reference of a sale draft.
pub fn validate_client_id(client_id: &str) -> ValidationResult<()> {
    if client_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "client".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items), anything above
/// [`MAX_AMOUNT_CENTS`] is not.
///
/// ## Example
/// ```rust
/// use backoffice_core::money::Money;
/// use backoffice_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(Money::from_cents(0)).is_ok());
/// assert!(validate_unit_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

/// Validates a sale discount: 0% to 100%.
pub fn validate_discount(rate: DiscountRate) -> ValidationResult<()> {
    if rate.bps() > FULL_DISCOUNT_BPS {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a shipping cost (non-negative, bounded like a unit price).
pub fn validate_shipping(shipping: Money) -> ValidationResult<()> {
    if shipping.is_negative() || shipping.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "shipping".to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// A sale cannot be registered without lines.
pub fn validate_line_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
