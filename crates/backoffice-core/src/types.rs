//! # Domain Types
//!
//! Core domain types used throughout the back-office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │      Sale       │   │     Client      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sku (lookup)   │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  description    │   │  client snapshot│◄──│  name           │       │
//! │  │  unit_price     │   │  items          │   │  national_id    │       │
//! │  │  unit_cost?     │   │  totals         │   │  address ...    │       │
//! │  └────────┬────────┘   │  fulfillment    │   └─────────────────┘       │
//! │           │            └────────┬────────┘                              │
//! │           │ cost snapshot       │                                       │
//! │           ▼                     ▼                                       │
//! │  ┌─────────────────┐   ┌─────────────────────────────────────┐         │
//! │  │  SaleLineItem   │   │  Fulfillment                        │         │
//! │  │  sku / MANUAL   │   │  stock:    Deducted | Pending       │         │
//! │  │  qty × price    │   │  payment:  Paid     | Pending       │         │
//! │  │  unit_cost?     │   │  delivery: Delivered| Pending       │         │
//! │  └─────────────────┘   └─────────────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A sale copies the client's id and name and each line copies the catalog
//! cost at the time of entry. Later edits to the client or the catalog never
//! rewrite historical sales.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{DiscountRate, Money};

/// Sentinel sku for lines entered without any sku.
pub const MANUAL_SKU: &str = "MANUAL";

// =============================================================================
// Catalog Item
// =============================================================================

/// Inventory level reported by the catalog provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    #[default]
    Normal,
    Missing,
    Excess,
}

/// An inventory item supplied by the catalog provider. Read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub sku: String,
    pub description: String,
    /// Tax-inclusive unit price.
    pub unit_price: Money,
    pub on_hand: i64,
    pub stock_level: StockLevel,
    /// Tax-exclusive unit cost, when the catalog knows it.
    pub unit_cost: Option<Money>,
}

impl CatalogItem {
    /// Case-insensitive exact sku match.
    pub fn matches_sku(&self, sku: &str) -> bool {
        self.sku.eq_ignore_ascii_case(sku.trim())
    }
}

// =============================================================================
// Client
// =============================================================================

/// A retail client in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    /// National id / tax id as typed by the user (DNI, CUIT, ...).
    pub national_id: String,
    pub email: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub postal_code: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Returns the denormalized reference a sale keeps.
    pub fn snapshot(&self) -> ClientRef {
        ClientRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    /// Editable fields of this client, for pre-filling an edit form.
    pub fn to_input(&self) -> ClientInput {
        ClientInput {
            name: self.name.clone(),
            national_id: self.national_id.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            province: self.province.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            address: self.address.clone(),
        }
    }
}

/// The editable fields of a client (the client form).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub postal_code: String,
    pub address: String,
}

impl ClientInput {
    /// Shorthand for a client with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        ClientInput {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Denormalized client snapshot stored on a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// One product entry within a sale.
///
/// Immutable once added; a sale's lines change only by replacing the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineItem {
    pub id: String,
    /// Sku as entered, or [`MANUAL_SKU`].
    pub sku: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// `quantity × unit_price`.
    pub line_total: Money,
    /// Catalog cost at the time the line was added (frozen).
    pub unit_cost: Option<Money>,
}

impl SaleLineItem {
    pub fn is_manual(&self) -> bool {
        self.sku == MANUAL_SKU
    }

    /// Estimated cost of the line, if the cost was snapshotted.
    pub fn cost_total(&self) -> Option<Money> {
        self.unit_cost.map(|c| c.multiply_quantity(self.quantity))
    }
}

// =============================================================================
// Fulfillment Statuses
// =============================================================================

/// Whether the sold units were deducted from stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Deducted,
    #[default]
    Pending,
}

/// Whether the client paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
}

/// Whether the order reached the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    #[default]
    Pending,
}

/// The three independent fulfillment dimensions of a sale.
///
/// No transition is forbidden; every dimension starts `Pending` and only
/// flips through an explicit edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fulfillment {
    pub stock: StockStatus,
    pub payment: PaymentStatus,
    pub delivery: DeliveryStatus,
}

impl Fulfillment {
    pub fn is_complete(&self) -> bool {
        self.stock == StockStatus::Deducted
            && self.payment == PaymentStatus::Paid
            && self.delivery == DeliveryStatus::Delivered
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A registered retail sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub date: NaiveDate,
    /// Client id at registration (snapshot, may outlive the client).
    pub client_id: String,
    /// Client display name at registration (snapshot).
    pub client_name: String,
    pub items: Vec<SaleLineItem>,
    pub subtotal: Money,
    pub discount: DiscountRate,
    pub shipping: Money,
    pub total: Money,
    pub fulfillment: Fulfillment,
    pub tracking_number: Option<String>,
    pub package_count: Option<u32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Whether the sale has a multi-line breakdown worth expanding.
    pub fn has_breakdown(&self) -> bool {
        self.items.len() > 1
    }

    /// Sum of snapshotted line costs. Lines without a cost are skipped.
    pub fn estimated_cost(&self) -> Money {
        self.items.iter().filter_map(SaleLineItem::cost_total).sum()
    }

    /// Whether every line carries a cost snapshot.
    pub fn has_complete_costs(&self) -> bool {
        self.items.iter().all(|i| i.unit_cost.is_some())
    }

    /// Total minus estimated cost. `None` unless every line has a cost.
    pub fn margin(&self) -> Option<Money> {
        self.has_complete_costs()
            .then(|| self.total - self.estimated_cost())
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
