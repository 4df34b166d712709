//! # Database State
//!
//! Wraps the optional `Database` connection for use in commands.
//!
//! The app runs without a database when configured offline or when the
//! database could not be opened at startup. Commands then skip persistence
//! and work purely on the in-memory retail state.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! if let Some(database) = db.inner() {
//!     database.sales().insert(&sale).await?;
//! }
//! ```

use backoffice_db::Database;

#[derive(Debug, Clone, Default)]
pub struct DbState {
    db: Option<Database>,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db: Some(db) }
    }

    /// No persistence: every command stays in memory.
    pub fn offline() -> Self {
        DbState { db: None }
    }

    /// Returns the inner Database, if one is open.
    pub fn inner(&self) -> Option<&Database> {
        self.db.as_ref()
    }

    pub fn is_online(&self) -> bool {
        self.db.is_some()
    }
}
