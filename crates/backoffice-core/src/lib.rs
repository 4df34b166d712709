//! # backoffice-core: Retail Sales Order Lifecycle
//!
//! Pure business logic for the retail back-office: registering sales with
//! line items, tracking their fulfillment, and keeping the client directory.
//! No database, no network, no file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Back-Office Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 backoffice-app (the caller)                     │   │
//! │  │   permission gate ─► core op ─► persistence ─► activity log    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ backoffice-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   session ──► line_item ──► totals                              │   │
//! │  │      │            │                                             │   │
//! │  │      │            └──► catalog (CatalogProvider)                │   │
//! │  │      ├──► sales   (SaleBook)                                    │   │
//! │  │      └──► clients (ClientDirectory)                             │   │
//! │  │                                                                 │   │
//! │  │   permissions • activity • money • validation • error           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                backoffice-db (SQLite collaborator)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sale, SaleLineItem, Client, CatalogItem)
//! - [`money`] - Money and DiscountRate (integer arithmetic only)
//! - [`totals`] - Subtotal / total calculator
//! - [`line_item`] - Line entry form and line builder
//! - [`catalog`] - Catalog provider trait and in-memory catalog
//! - [`sales`] - Sale record manager
//! - [`clients`] - Client directory manager
//! - [`session`] - Per-user view state (forms, edit targets, expanded rows)
//! - [`permissions`] - Per-section permission matrix
//! - [`activity`] - Activity events for the audit log
//! - [`validation`] - Input rules checked before anything is committed
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use backoffice_core::money::{DiscountRate, Money};
//! use backoffice_core::totals::calculate_totals;
//! use backoffice_core::types::SaleLineItem;
//!
//! let line = SaleLineItem {
//!     id: "l1".to_string(),
//!     sku: "SKU123".to_string(),
//!     description: "Producto A".to_string(),
//!     quantity: 2,
//!     unit_price: Money::from_cents(2750),
//!     line_total: Money::from_cents(5500),
//!     unit_cost: None,
//! };
//!
//! let totals = calculate_totals(&[line], DiscountRate::from_percent(10), Money::from_cents(500));
//! assert_eq!(totals.subtotal.cents(), 5500);
//! assert_eq!(totals.total.cents(), 5450);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod activity;
pub mod catalog;
pub mod clients;
pub mod error;
pub mod line_item;
pub mod money;
pub mod permissions;
pub mod sales;
pub mod session;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use activity::{ActivityAction, ActivityEvent, ActivitySink, NoActivity};
pub use catalog::{CatalogProvider, InMemoryCatalog};
pub use clients::ClientDirectory;
pub use error::{CollaboratorError, CoreError, CoreResult, ValidationError};
pub use money::{DiscountRate, Money};
pub use permissions::{PermissionMatrix, Role, Section, UserAccount};
pub use sales::{SaleBook, SaleDraft, SaleFilter, SalesSummary};
pub use session::Session;
pub use totals::Totals;
pub use types::*;
