//! # Catalog Provider
//!
//! The catalog is an external collaborator: it supplies inventory items for
//! autofill and cost snapshots. The core only ever reads from it.
//!
//! [`InMemoryCatalog`] is the snapshot the app loads at startup (or seeds in
//! tests); any other source only has to implement [`CatalogProvider`].

use tracing::warn;

use crate::error::CollaboratorError;
use crate::types::CatalogItem;

/// Read-only access to inventory items.
pub trait CatalogProvider {
    /// Looks up an item by sku, case-insensitively. `Ok(None)` is a miss.
    fn lookup(&self, sku: &str) -> Result<Option<CatalogItem>, CollaboratorError>;
}

/// Looks up a sku, treating empty input and collaborator failures as a miss.
///
/// A failing catalog never blocks a sale: the user can still type the line
/// by hand.
pub fn find_item(catalog: &dyn CatalogProvider, sku: &str) -> Option<CatalogItem> {
    let sku = sku.trim();
    if sku.is_empty() {
        return None;
    }

    match catalog.lookup(sku) {
        Ok(item) => item,
        Err(e) => {
            warn!(sku = %sku, error = %e, "Catalog lookup failed, continuing without it");
            None
        }
    }
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    items: Vec<CatalogItem>,
}

impl InMemoryCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        InMemoryCatalog { items }
    }

    /// Inserts an item, replacing any item with the same sku (ignoring case).
    pub fn upsert(&mut self, item: CatalogItem) {
        match self.items.iter_mut().find(|i| i.matches_sku(&item.sku)) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn lookup(&self, sku: &str) -> Result<Option<CatalogItem>, CollaboratorError> {
        Ok(self.items.iter().find(|i| i.matches_sku(sku)).cloned())
    }
}
