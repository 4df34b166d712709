//! # backoffice-db: Persistence Collaborator
//!
//! SQLite storage for clients, sales, the catalog snapshot and the activity
//! log, using sqlx on tokio.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  app command (register_sale)                                           │
//! │       │  core op already applied in memory                             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  backoffice-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌──────────────┐ │   │
//! │  │   │   Database    │    │   Repositories   │   │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │◄───│ Client / Sale    │   │  (embedded)  │ │   │
//! │  │   │  SqlitePool   │    │ Catalog/Activity │   │ 001_init.sql │ │   │
//! │  │   └───────────────┘    └──────────────────┘   └──────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir) or :memory:                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use backoffice_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("backoffice.db")).await?;
//! let clients = db.clients().list().await?;
//! let sales = db.sales().list().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::activity::ActivityLogRepository;
pub use repository::catalog::CatalogRepository;
pub use repository::client::ClientRepository;
pub use repository::sale::SaleRepository;
