//! # Sale Record Manager
//!
//! Owns the in-memory collection of registered sales, most recent first.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. REGISTER                                                           │
//! │     └── register(draft) → validate → totals → new id → prepend         │
//! │                                                                         │
//! │  2. EDIT (any number of times)                                         │
//! │     └── update(id, draft) → validate → totals → replace IN PLACE       │
//! │         (same id, same position, created_at kept)                      │
//! │                                                                         │
//! │  3. DELETE (confirmed upstream)                                        │
//! │     └── delete(id) → removed, no cascade to catalog or clients         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence is the caller's job: nothing here waits on a database.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::activity::{ActivityAction, ActivityEvent, ActivitySink};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{DiscountRate, Money};
use crate::totals::{calculate_totals, Totals};
use crate::types::{
    ClientRef, DeliveryStatus, Fulfillment, PaymentStatus, Sale, SaleLineItem, StockStatus,
};
use crate::validation::{
    validate_client_id, validate_discount, validate_line_count, validate_shipping,
    ValidationResult,
};

// =============================================================================
// Sale Draft
// =============================================================================

/// Everything the user entered for a sale, before registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDraft {
    pub date: NaiveDate,
    /// Client snapshot copied when the client was selected.
    pub client: Option<ClientRef>,
    pub items: Vec<SaleLineItem>,
    pub discount: DiscountRate,
    pub shipping: Money,
    pub fulfillment: Fulfillment,
    pub tracking_number: Option<String>,
    pub package_count: Option<u32>,
    pub notes: Option<String>,
}

impl Default for SaleDraft {
    fn default() -> Self {
        SaleDraft {
            date: Utc::now().date_naive(),
            client: None,
            items: Vec::new(),
            discount: DiscountRate::zero(),
            shipping: Money::zero(),
            fulfillment: Fulfillment::default(),
            tracking_number: None,
            package_count: None,
            notes: None,
        }
    }
}

impl SaleDraft {
    /// Pre-fills a draft from an existing sale (edit mode).
    pub fn from_sale(sale: &Sale) -> Self {
        SaleDraft {
            date: sale.date,
            client: Some(ClientRef {
                id: sale.client_id.clone(),
                name: sale.client_name.clone(),
            }),
            items: sale.items.clone(),
            discount: sale.discount,
            shipping: sale.shipping,
            fulfillment: sale.fulfillment,
            tracking_number: sale.tracking_number.clone(),
            package_count: sale.package_count,
            notes: sale.notes.clone(),
        }
    }

    /// Live totals for the form.
    pub fn totals(&self) -> Totals {
        calculate_totals(&self.items, self.discount, self.shipping)
    }

    /// Checks the draft and returns the client snapshot to register against.
    pub fn validate(&self) -> ValidationResult<&ClientRef> {
        let client = self.client.as_ref().ok_or_else(|| ValidationError::Required {
            field: "client".to_string(),
        })?;
        validate_client_id(&client.id)?;
        validate_line_count(self.items.len())?;
        validate_discount(self.discount)?;
        validate_shipping(self.shipping)?;
        Ok(client)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Reporting
// =============================================================================

/// Headline numbers over the whole sale book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalesSummary {
    pub count: usize,
    pub revenue: Money,
    pub paid: usize,
    pub delivered: usize,
    pub pending_stock: usize,
}

/// List filter: free text over client name, sale id and skus, plus status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleFilter {
    pub query: String,
    pub payment: Option<PaymentStatus>,
    pub delivery: Option<DeliveryStatus>,
}

impl SaleFilter {
    pub fn matches(&self, sale: &Sale) -> bool {
        if self.payment.is_some_and(|p| p != sale.fulfillment.payment) {
            return false;
        }
        if self.delivery.is_some_and(|d| d != sale.fulfillment.delivery) {
            return false;
        }

        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        sale.client_name.to_lowercase().contains(&query)
            || sale.id.to_lowercase().contains(&query)
            || sale
                .items
                .iter()
                .any(|i| i.sku.to_lowercase().contains(&query))
    }
}

// =============================================================================
// Sale Book
// =============================================================================

/// The sale collection, ordered most recent first.
#[derive(Debug, Clone, Default)]
pub struct SaleBook {
    sales: Vec<Sale>,
}

impl SaleBook {
    pub fn new() -> Self {
        SaleBook::default()
    }

    /// Wraps sales already ordered most recent first (e.g. loaded from storage).
    pub fn from_sales(sales: Vec<Sale>) -> Self {
        SaleBook { sales }
    }

    pub fn list(&self) -> &[Sale] {
        &self.sales
    }

    pub fn get(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.sales.iter().position(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// Registers a new sale from a draft.
    ///
    /// ## Errors
    /// `Validation` when no client is selected, no line was added, the
    /// discount exceeds 100% or shipping is negative.
    pub fn register(&mut self, draft: SaleDraft, sink: &mut dyn ActivitySink) -> CoreResult<Sale> {
        let client = draft.validate()?.clone();
        let totals = draft.totals();
        let now = Utc::now();

        let sale = Sale {
            id: self.next_id(),
            date: draft.date,
            client_id: client.id,
            client_name: client.name,
            subtotal: totals.subtotal,
            discount: draft.discount,
            shipping: draft.shipping,
            total: totals.total,
            fulfillment: draft.fulfillment,
            tracking_number: non_blank(&draft.tracking_number),
            package_count: draft.package_count,
            notes: non_blank(&draft.notes),
            items: draft.items,
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %sale.id,
            client_id = %sale.client_id,
            items = sale.items.len(),
            total = %sale.total,
            "Sale registered"
        );

        self.sales.insert(0, sale.clone());
        sink.record(ActivityEvent::new(
            ActivityAction::CreateRetailSale,
            &sale.id,
            None,
            Some(&sale),
        ));
        Ok(sale)
    }

    /// Replaces an existing sale in place, keeping its id, position and
    /// creation time.
    pub fn update(
        &mut self,
        id: &str,
        draft: SaleDraft,
        sink: &mut dyn ActivitySink,
    ) -> CoreResult<Sale> {
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;
        let client = draft.validate()?.clone();
        let totals = draft.totals();

        let before = self.sales[index].clone();
        let updated = Sale {
            id: before.id.clone(),
            date: draft.date,
            client_id: client.id,
            client_name: client.name,
            subtotal: totals.subtotal,
            discount: draft.discount,
            shipping: draft.shipping,
            total: totals.total,
            fulfillment: draft.fulfillment,
            tracking_number: non_blank(&draft.tracking_number),
            package_count: draft.package_count,
            notes: non_blank(&draft.notes),
            items: draft.items,
            created_at: before.created_at,
            updated_at: Utc::now(),
        };

        debug!(id = %updated.id, position = index, total = %updated.total, "Sale updated");

        self.sales[index] = updated.clone();
        sink.record(ActivityEvent::new(
            ActivityAction::UpdateRetailSale,
            &updated.id,
            Some(&before),
            Some(&updated),
        ));
        Ok(updated)
    }

    /// Removes a sale. Deleting an unknown id is a `SaleNotFound` error.
    pub fn delete(&mut self, id: &str, sink: &mut dyn ActivitySink) -> CoreResult<Sale> {
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;
        let removed = self.sales.remove(index);

        debug!(id = %removed.id, "Sale deleted");

        sink.record(ActivityEvent::new(
            ActivityAction::DeleteRetailSale,
            &removed.id,
            Some(&removed),
            None,
        ));
        Ok(removed)
    }

    pub fn summary(&self) -> SalesSummary {
        SalesSummary {
            count: self.sales.len(),
            revenue: self.sales.iter().map(|s| s.total).sum(),
            paid: self
                .sales
                .iter()
                .filter(|s| s.fulfillment.payment == PaymentStatus::Paid)
                .count(),
            delivered: self
                .sales
                .iter()
                .filter(|s| s.fulfillment.delivery == DeliveryStatus::Delivered)
                .count(),
            pending_stock: self
                .sales
                .iter()
                .filter(|s| s.fulfillment.stock == StockStatus::Pending)
                .count(),
        }
    }

    pub fn filter(&self, filter: &SaleFilter) -> Vec<&Sale> {
        self.sales.iter().filter(|s| filter.matches(s)).collect()
    }

    fn next_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
