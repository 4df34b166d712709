//! # State Module
//!
//! Application state for the back-office.
//!
//! Separate state types instead of one `AppState`: each command declares
//! exactly the state it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │   DbState    │  │ RetailState  │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Option<     │  │  Arc<Mutex<  │  │  store_name      │              │
//! │  │   Database>  │  │    Retail    │  │  database_path   │              │
//! │  │  (None when  │  │  >>          │  │  offline         │              │
//! │  │   offline)   │  │              │  │  currency        │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • RetailState: Protected by Arc<Mutex<T>> for exclusive access        │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod retail;

pub use config::{ConfigState, DATABASE_FILE};
pub use db::DbState;
pub use retail::{Retail, RetailState};
