//! # Sale Commands
//!
//! The sale form (draft, pending line, client selection), registration and
//! editing, deletion, expansion and reporting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{record_activity, require_view, require_write};
use crate::error::ApiError;
use crate::state::{ConfigState, DbState, RetailState};
use backoffice_core::{
    DiscountRate, Fulfillment, Money, Sale, SaleFilter, SaleLineItem, Session, UserAccount,
};

// =============================================================================
// DTOs
// =============================================================================

/// The editable header fields of the sale form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetails {
    pub date: NaiveDate,
    /// Basis points (1000 = 10%).
    pub discount_bps: u32,
    pub shipping_cents: i64,
    #[serde(default)]
    pub fulfillment: Fulfillment,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub package_count: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Manual fields of the pending line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFields {
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// Live state of the sale form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub editing_sale_id: Option<String>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub line_count: usize,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
}

impl From<&Session> for DraftResponse {
    fn from(session: &Session) -> Self {
        let totals = session.totals();
        let client = session.draft.client.as_ref();
        DraftResponse {
            editing_sale_id: session.editing_sale().map(str::to_string),
            client_id: client.map(|c| c.id.clone()),
            client_name: client.map(|c| c.name.clone()),
            line_count: session.draft.items.len(),
            subtotal_cents: totals.subtotal.cents(),
            discount_cents: totals.discount_amount.cents(),
            shipping_cents: session.draft.shipping.cents(),
            total_cents: totals.total.cents(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    /// Whether the catalog filled description and price.
    pub autofilled: bool,
    pub sku: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub line: SaleLineItem,
    pub draft: DraftResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub sale_id: String,
    pub client_name: String,
    pub item_count: usize,
    pub subtotal_cents: i64,
    pub total_cents: i64,
    /// `true` when an existing sale was edited.
    pub updated: bool,
    /// `false` when running without a database.
    pub persisted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub count: usize,
    pub revenue_cents: i64,
    pub revenue_display: String,
    pub paid: usize,
    pub delivered: usize,
    pub pending_stock: usize,
}

// =============================================================================
// Sale Form
// =============================================================================

/// Opens a blank sale form, keeping a client selected for a new sale.
pub fn begin_new_sale(retail: &RetailState) -> DraftResponse {
    debug!("begin_new_sale command");
    retail.with_retail_mut(|r| {
        r.session.begin_new_sale();
        DraftResponse::from(&r.session)
    })
}

/// Loads an existing sale into the form.
pub fn begin_edit_sale(retail: &RetailState, sale_id: &str) -> Result<DraftResponse, ApiError> {
    debug!(sale_id = %sale_id, "begin_edit_sale command");
    retail.with_retail_mut(|r| -> Result<DraftResponse, ApiError> {
        let sale = r
            .sales
            .get(sale_id)
            .ok_or_else(|| ApiError::not_found("Sale", sale_id))?;
        r.session.begin_edit_sale(sale);
        Ok(DraftResponse::from(&r.session))
    })
}

/// Discards the form. A sale being edited stays as registered.
pub fn cancel_sale(retail: &RetailState) -> DraftResponse {
    debug!("cancel_sale command");
    retail.with_retail_mut(|r| {
        r.session.cancel_sale();
        DraftResponse::from(&r.session)
    })
}

pub fn get_draft(retail: &RetailState) -> DraftResponse {
    retail.with_retail(|r| DraftResponse::from(&r.session))
}

/// Replaces the header fields of the form. Nothing is validated until submit.
pub fn set_sale_details(retail: &RetailState, details: SaleDetails) -> DraftResponse {
    debug!(
        date = %details.date,
        discount_bps = details.discount_bps,
        shipping = details.shipping_cents,
        "set_sale_details command"
    );
    retail.with_retail_mut(|r| {
        let draft = &mut r.session.draft;
        draft.date = details.date;
        draft.discount = DiscountRate::from_bps(details.discount_bps);
        draft.shipping = Money::from_cents(details.shipping_cents);
        draft.fulfillment = details.fulfillment;
        draft.tracking_number = details.tracking_number;
        draft.package_count = details.package_count;
        draft.notes = details.notes;
        DraftResponse::from(&r.session)
    })
}

/// Selects a directory client for the sale.
pub fn select_client(retail: &RetailState, client_id: &str) -> Result<DraftResponse, ApiError> {
    debug!(client_id = %client_id, "select_client command");
    retail.with_retail_mut(|r| -> Result<DraftResponse, ApiError> {
        let client = r
            .clients
            .get(client_id)
            .ok_or_else(|| ApiError::not_found("Client", client_id))?;
        r.session.select_client(client);
        Ok(DraftResponse::from(&r.session))
    })
}

// =============================================================================
// Pending Line
// =============================================================================

/// Sets the pending sku, autofilling description and price on a catalog hit.
pub fn set_entry_sku(retail: &RetailState, sku: &str) -> EntryResponse {
    retail.with_retail_mut(|r| {
        let autofilled = r.session.set_entry_sku(sku, &r.catalog);
        debug!(sku = %sku, autofilled, "set_entry_sku command");

        let entry = &r.session.entry;
        EntryResponse {
            autofilled,
            sku: entry.sku.clone(),
            description: entry.description.clone(),
            quantity: entry.quantity,
            unit_price_cents: entry.unit_price.cents(),
        }
    })
}

/// Sets the typed fields of the pending line, leaving the sku alone.
pub fn set_entry_fields(retail: &RetailState, fields: EntryFields) {
    retail.with_retail_mut(|r| {
        let entry = &mut r.session.entry;
        entry.description = fields.description;
        entry.quantity = fields.quantity;
        entry.unit_price = Money::from_cents(fields.unit_price_cents);
    });
}

/// Appends the pending line to the draft.
///
/// A rejected line leaves the pending fields as typed.
pub fn add_line(retail: &RetailState) -> Result<LineResponse, ApiError> {
    retail.with_retail_mut(|r| -> Result<LineResponse, ApiError> {
        let line = r.session.add_line(&r.catalog)?;
        debug!(line_id = %line.id, sku = %line.sku, total = %line.line_total, "Line added");

        Ok(LineResponse {
            line,
            draft: DraftResponse::from(&r.session),
        })
    })
}

pub fn remove_line(retail: &RetailState, line_id: &str) -> Result<DraftResponse, ApiError> {
    retail.with_retail_mut(|r| {
        if !r.session.remove_line(line_id) {
            return Err(ApiError::not_found("Line", line_id));
        }
        Ok(DraftResponse::from(&r.session))
    })
}

// =============================================================================
// Registration / Deletion
// =============================================================================

/// Submits the sale form: registers a new sale, or applies the form to the
/// sale being edited.
pub async fn register_sale(
    actor: &UserAccount,
    db: &DbState,
    retail: &RetailState,
) -> Result<SaleResponse, ApiError> {
    debug!(user = %actor.email, "register_sale command");
    require_write(actor)?;

    let mut events = Vec::new();
    let (sale, updated) = retail.with_retail_mut(|r| {
        let updated = r.session.editing_sale().is_some();
        r.session
            .submit_sale(&mut r.sales, &mut events)
            .map(|sale| (sale, updated))
    })?;

    let persisted = match db.inner() {
        Some(database) => {
            let repo = database.sales();
            let result = if updated {
                match repo.update(&sale).await {
                    // Never reached the database (an earlier insert failed).
                    Err(e) if e.is_not_found() => repo.insert(&sale).await,
                    other => other,
                }
            } else {
                repo.insert(&sale).await
            };

            if let Err(e) = result {
                warn!(sale_id = %sale.id, error = %e, "Sale kept in memory only");
                return Err(e.into());
            }

            record_activity(db, &events).await;
            true
        }
        None => false,
    };

    info!(
        sale_id = %sale.id,
        client = %sale.client_name,
        total = %sale.total,
        items = sale.items.len(),
        updated,
        "Sale saved"
    );

    Ok(SaleResponse {
        sale_id: sale.id,
        client_name: sale.client_name,
        item_count: sale.items.len(),
        subtotal_cents: sale.subtotal.cents(),
        total_cents: sale.total.cents(),
        updated,
        persisted,
    })
}

/// Deletes a registered sale.
pub async fn delete_sale(
    actor: &UserAccount,
    db: &DbState,
    retail: &RetailState,
    sale_id: &str,
) -> Result<(), ApiError> {
    debug!(user = %actor.email, sale_id = %sale_id, "delete_sale command");
    require_write(actor)?;

    let mut events = Vec::new();
    retail.with_retail_mut(|r| r.session.delete_sale(&mut r.sales, sale_id, &mut events))?;

    if let Some(database) = db.inner() {
        match database.sales().delete(sale_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!(sale_id = %sale_id, "Sale was never stored");
            }
            Err(e) => {
                warn!(sale_id = %sale_id, error = %e, "Sale removed from memory only");
                return Err(e.into());
            }
        }
        record_activity(db, &events).await;
    }

    info!(sale_id = %sale_id, "Sale deleted");
    Ok(())
}

// =============================================================================
// List View
// =============================================================================

/// Flips the line breakdown of a sale. Returns whether it is now expanded.
pub fn toggle_expansion(retail: &RetailState, sale_id: &str) -> bool {
    retail.with_retail_mut(|r| r.session.toggle_expansion(sale_id))
}

/// Sales matching the filter, newest first.
pub fn list_sales(
    actor: &UserAccount,
    retail: &RetailState,
    filter: &SaleFilter,
) -> Result<Vec<Sale>, ApiError> {
    require_view(actor)?;
    Ok(retail.with_retail(|r| r.sales.filter(filter).into_iter().cloned().collect()))
}

pub fn sales_summary(
    actor: &UserAccount,
    retail: &RetailState,
    config: &ConfigState,
) -> Result<SummaryResponse, ApiError> {
    require_view(actor)?;
    let summary = retail.with_retail(|r| r.sales.summary());

    Ok(SummaryResponse {
        count: summary.count,
        revenue_cents: summary.revenue.cents(),
        revenue_display: config.format_currency(summary.revenue),
        paid: summary.paid,
        delivered: summary.delivered,
        pending_stock: summary.pending_stock,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::Retail;
    use backoffice_core::{CatalogItem, ClientInput, InMemoryCatalog, Role, StockLevel};

    fn admin() -> UserAccount {
        UserAccount::new("u1", "admin@shop.test", "Admin", Role::Admin)
    }

    fn retail_with_catalog() -> RetailState {
        RetailState::from_retail(Retail {
            catalog: InMemoryCatalog::new(vec![CatalogItem {
                sku: "SKU123".to_string(),
                description: "Producto A".to_string(),
                unit_price: Money::from_cents(2750),
                on_hand: 5,
                stock_level: StockLevel::Normal,
                unit_cost: Some(Money::from_cents(1500)),
            }]),
            ..Retail::default()
        })
    }

    fn select_new_client(retail: &RetailState) {
        retail.with_retail_mut(|r| {
            r.session.client_form = ClientInput::named("Juan Pérez");
            r.session
                .submit_client(&mut r.clients, &mut Vec::new())
                .unwrap();
        });
    }

    #[test]
    fn test_entry_autofill_and_add_line() {
        let retail = retail_with_catalog();

        let entry = set_entry_sku(&retail, "sku123");
        assert!(entry.autofilled);
        assert_eq!(entry.description, "Producto A");
        assert_eq!(entry.unit_price_cents, 2750);

        let added = add_line(&retail).unwrap();
        assert_eq!(added.line.sku, "sku123");
        assert_eq!(added.line.unit_cost, Some(Money::from_cents(1500)));
        assert_eq!(added.draft.subtotal_cents, 2750);
    }

    #[test]
    fn test_rejected_line_keeps_entry() {
        let retail = retail_with_catalog();
        set_entry_fields(
            &retail,
            EntryFields {
                description: "Envoltorio".to_string(),
                quantity: 0,
                unit_price_cents: 300,
            },
        );

        let err = add_line(&retail).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        retail.with_retail(|r| {
            assert_eq!(r.session.entry.description, "Envoltorio");
            assert!(r.session.draft.items.is_empty());
        });
    }

    #[test]
    fn test_oversized_quantity_is_a_validation_error() {
        let retail = retail_with_catalog();
        set_entry_fields(
            &retail,
            EntryFields {
                description: "Bulk".to_string(),
                quantity: i64::MAX / 2,
                unit_price_cents: 2750,
            },
        );

        let err = add_line(&retail).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // The lock is still usable afterwards.
        assert_eq!(get_draft(&retail).subtotal_cents, 0);
    }

    #[tokio::test]
    async fn test_register_offline() {
        let retail = retail_with_catalog();
        select_new_client(&retail);
        set_entry_sku(&retail, "SKU123");
        set_entry_fields(
            &retail,
            EntryFields {
                description: "Producto A".to_string(),
                quantity: 2,
                unit_price_cents: 2750,
            },
        );
        add_line(&retail).unwrap();
        set_sale_details(
            &retail,
            SaleDetails {
                date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                discount_bps: 1000,
                shipping_cents: 500,
                fulfillment: Fulfillment::default(),
                tracking_number: None,
                package_count: None,
                notes: None,
            },
        );

        let response = register_sale(&admin(), &DbState::offline(), &retail)
            .await
            .unwrap();
        assert_eq!(response.subtotal_cents, 5500);
        assert_eq!(response.total_cents, 5450);
        assert!(!response.persisted);
        assert!(!response.updated);

        let draft = get_draft(&retail);
        assert_eq!(draft.line_count, 0);
        assert_eq!(draft.discount_cents, 0);
    }

    #[tokio::test]
    async fn test_viewer_cannot_register() {
        let retail = retail_with_catalog();
        let viewer = UserAccount::new("u2", "v@shop.test", "Viewer", Role::Viewer);

        let err = register_sale(&viewer, &DbState::offline(), &retail)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn test_edit_unknown_sale() {
        let retail = RetailState::new();
        let err = begin_edit_sale(&retail, "nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_summary_formats_revenue() {
        let retail = RetailState::new();
        let summary = sales_summary(&admin(), &retail, &ConfigState::default()).unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.revenue_display, "$0.00");
    }
}
