//! # Retail State
//!
//! The in-memory retail workspace of one user: the session (form and view
//! state), the sale book, the client directory and the catalog snapshot.
//!
//! ## Locking
//! All four sit behind one lock: submitting a sale touches the session and
//! the sale book together, and creating a client touches the directory and
//! the sale draft.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RetailState = Arc<Mutex<Retail>>                                       │
//! │                                                                         │
//! │  Retail                                                                 │
//! │  ├── session   Session           draft, entry, editing, expansion       │
//! │  ├── sales     SaleBook          registered sales, newest first         │
//! │  ├── clients   ClientDirectory   retail clients, newest first           │
//! │  └── catalog   InMemoryCatalog   snapshot used for autofill             │
//! │                                                                         │
//! │  NOTE: the lock is never held across an `.await`. Commands run the      │
//! │        core operation inside `with_retail_mut`, then persist.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use backoffice_core::{ClientDirectory, InMemoryCatalog, SaleBook, Session};

#[derive(Debug, Default)]
pub struct Retail {
    pub session: Session,
    pub sales: SaleBook,
    pub clients: ClientDirectory,
    pub catalog: InMemoryCatalog,
}

#[derive(Debug, Clone, Default)]
pub struct RetailState {
    retail: Arc<Mutex<Retail>>,
}

impl RetailState {
    /// An empty workspace.
    pub fn new() -> Self {
        RetailState::default()
    }

    /// Wraps a workspace loaded at startup.
    pub fn from_retail(retail: Retail) -> Self {
        RetailState {
            retail: Arc::new(Mutex::new(retail)),
        }
    }

    /// Executes a function with read access to the workspace.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let summary = retail_state.with_retail(|r| r.sales.summary());
    /// ```
    pub fn with_retail<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Retail) -> R,
    {
        // Poisoned locks are recovered, not propagated.
        let retail = self.retail.lock().unwrap_or_else(PoisonError::into_inner);
        f(&retail)
    }

    /// Executes a function with write access to the workspace.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// retail_state.with_retail_mut(|r| r.session.toggle_expansion(&id));
    /// ```
    pub fn with_retail_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Retail) -> R,
    {
        let mut retail = self.retail.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut retail)
    }
}
