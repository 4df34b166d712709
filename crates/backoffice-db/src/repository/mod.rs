//! # Repository Module
//!
//! One repository per table group. Each holds a clone of the pool and maps
//! rows through a private `*Row` struct (`sqlx::FromRow`) into the domain
//! types of `backoffice-core`.
//!
//! ```text
//! app command
//!      │   db.sales().insert(&sale)
//!      ▼
//! SaleRepository ──► SQL ──► SQLite
//!      │
//!      └── SaleRow / SaleItemRow ──► backoffice_core::Sale
//! ```
//!
//! ## Available Repositories
//!
//! - [`client::ClientRepository`] - Client directory persistence
//! - [`sale::SaleRepository`] - Sales with their line items
//! - [`catalog::CatalogRepository`] - Catalog snapshot and sku lookup
//! - [`activity::ActivityLogRepository`] - Activity log entries

pub mod activity;
pub mod catalog;
pub mod client;
pub mod sale;
