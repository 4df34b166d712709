//! # Catalog Commands
//!
//! The sale form autofills from an in-memory snapshot of the catalog. This
//! refreshes the snapshot from the database.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{DbState, RetailState};
use backoffice_core::InMemoryCatalog;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub item_count: usize,
    /// `false` when offline and the existing snapshot was kept.
    pub refreshed: bool,
}

/// Reloads the catalog snapshot from the database.
pub async fn load_catalog(db: &DbState, retail: &RetailState) -> Result<CatalogResponse, ApiError> {
    debug!("load_catalog command");

    let Some(database) = db.inner() else {
        let item_count = retail.with_retail(|r| r.catalog.len());
        return Ok(CatalogResponse {
            item_count,
            refreshed: false,
        });
    };

    let items = database.catalog().list().await?;
    let item_count = items.len();
    retail.with_retail_mut(|r| r.catalog = InMemoryCatalog::new(items));

    info!(items = item_count, "Catalog loaded");
    Ok(CatalogResponse {
        item_count,
        refreshed: true,
    })
}
