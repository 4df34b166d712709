//! # Session (View-State Coordinator)
//!
//! Session-scoped state for one user working the retail screen. The session
//! is passed explicitly into every operation; nothing here is global.
//!
//! ## What the Session Tracks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Session                                      │
//! │                                                                         │
//! │  editing_sale    Option<id>   at most one sale mid-edit                 │
//! │  editing_client  Option<id>   at most one client mid-edit               │
//! │  viewing_client  Option<id>   read-only client detail                   │
//! │  expanded        {ids}        sales showing their line breakdown        │
//! │                                                                         │
//! │  draft           SaleDraft    the sale form (date, client, lines, ...)  │
//! │  entry           LineEntry    the pending line fields                   │
//! │  client_form     ClientInput  the client form                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Form Rules
//! - A successful submit or a cancel resets the form fully.
//! - A failed submit leaves every form field exactly as the user left it.
//! - Entering edit mode pre-fills the draft from the sale; canceling never
//!   touches the sale itself.
//! - Creating a client selects it for the sale draft, and a following
//!   `begin_new_sale` keeps that selection.

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::activity::ActivitySink;
use crate::catalog::CatalogProvider;
use crate::clients::ClientDirectory;
use crate::error::CoreResult;
use crate::line_item::{build_line, LineEntry};
use crate::sales::{SaleBook, SaleDraft};
use crate::totals::Totals;
use crate::types::{Client, ClientInput, Sale, SaleLineItem};
use crate::validation::ValidationResult;

#[derive(Debug, Clone, Default)]
pub struct Session {
    editing_sale: Option<String>,
    editing_client: Option<String>,
    viewing_client: Option<String>,
    expanded: HashSet<String>,

    /// The sale form.
    pub draft: SaleDraft,
    /// The pending line of the sale form.
    pub entry: LineEntry,
    /// The client form.
    pub client_form: ClientInput,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn editing_sale(&self) -> Option<&str> {
        self.editing_sale.as_deref()
    }

    pub fn editing_client(&self) -> Option<&str> {
        self.editing_client.as_deref()
    }

    pub fn viewing_client(&self) -> Option<&str> {
        self.viewing_client.as_deref()
    }

    /// Live totals of the sale form.
    pub fn totals(&self) -> Totals {
        self.draft.totals()
    }

    // =========================================================================
    // Sale Form
    // =========================================================================

    /// Opens a blank sale form.
    ///
    /// A client already selected for a new sale (e.g. one just created) stays
    /// selected. Coming out of edit mode starts fully blank.
    pub fn begin_new_sale(&mut self) {
        let client = if self.editing_sale.is_none() {
            self.draft.client.take()
        } else {
            None
        };

        self.reset_sale_form();
        self.draft.client = client;
    }

    /// Enters edit mode for `sale`, pre-filling every draft field from it.
    pub fn begin_edit_sale(&mut self, sale: &Sale) {
        debug!(id = %sale.id, "Editing sale");
        self.editing_sale = Some(sale.id.clone());
        self.draft = SaleDraft::from_sale(sale);
        self.entry.clear();
    }

    /// Discards the sale form. The sale being edited, if any, is untouched.
    pub fn cancel_sale(&mut self) {
        self.reset_sale_form();
    }

    /// Copies the client's id and name into the draft.
    pub fn select_client(&mut self, client: &Client) {
        self.draft.client = Some(client.snapshot());
    }

    /// Sets the pending sku and applies catalog autofill.
    pub fn set_entry_sku(&mut self, sku: impl Into<String>, catalog: &dyn CatalogProvider) -> bool {
        self.entry.set_sku(sku, catalog)
    }

    /// Builds a line from the pending entry and appends it to the draft.
    ///
    /// On success the entry is cleared; on failure it keeps the user's input.
    pub fn add_line(&mut self, catalog: &dyn CatalogProvider) -> ValidationResult<SaleLineItem> {
        let line = build_line(Uuid::new_v4().to_string(), &self.entry, catalog)?;
        self.draft.items.push(line.clone());
        self.entry.clear();
        Ok(line)
    }

    /// Drops a pending line from the draft.
    pub fn remove_line(&mut self, line_id: &str) -> bool {
        let before = self.draft.items.len();
        self.draft.items.retain(|l| l.id != line_id);
        self.draft.items.len() != before
    }

    /// Registers the draft, or applies it to the sale being edited.
    pub fn submit_sale(
        &mut self,
        sales: &mut SaleBook,
        sink: &mut dyn ActivitySink,
    ) -> CoreResult<Sale> {
        let sale = match self.editing_sale.clone() {
            Some(id) => sales.update(&id, self.draft.clone(), sink)?,
            None => sales.register(self.draft.clone(), sink)?,
        };

        self.reset_sale_form();
        Ok(sale)
    }

    /// Deletes a sale and drops any view state that pointed at it.
    pub fn delete_sale(
        &mut self,
        sales: &mut SaleBook,
        id: &str,
        sink: &mut dyn ActivitySink,
    ) -> CoreResult<Sale> {
        let removed = sales.delete(id, sink)?;
        self.forget_sale(id);
        Ok(removed)
    }

    /// Removes a sale id from the expanded set and cancels an edit of it.
    pub fn forget_sale(&mut self, id: &str) {
        self.expanded.remove(id);
        if self.editing_sale.as_deref() == Some(id) {
            self.cancel_sale();
        }
    }

    fn reset_sale_form(&mut self) {
        self.editing_sale = None;
        self.draft = SaleDraft::default();
        self.entry.clear();
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// Flips whether a sale shows its line breakdown. Returns the new state.
    pub fn toggle_expansion(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    // =========================================================================
    // Client Form
    // =========================================================================

    pub fn begin_new_client(&mut self) {
        self.editing_client = None;
        self.client_form = ClientInput::default();
    }

    pub fn begin_edit_client(&mut self, client: &Client) {
        self.editing_client = Some(client.id.clone());
        self.client_form = client.to_input();
    }

    pub fn cancel_client(&mut self) {
        self.begin_new_client();
    }

    pub fn view_client(&mut self, client: &Client) {
        self.viewing_client = Some(client.id.clone());
    }

    pub fn close_client_view(&mut self) {
        self.viewing_client = None;
    }

    /// Creates a client from the form, or updates the one being edited.
    ///
    /// A newly created client becomes the selected client of the sale draft.
    pub fn submit_client(
        &mut self,
        clients: &mut ClientDirectory,
        sink: &mut dyn ActivitySink,
    ) -> CoreResult<Client> {
        let client = match self.editing_client.clone() {
            Some(id) => clients.update(&id, self.client_form.clone(), sink)?,
            None => {
                let created = clients.create(self.client_form.clone(), sink)?;
                self.select_client(&created);
                created
            }
        };

        self.begin_new_client();
        Ok(client)
    }

    /// Deletes a client and closes any form or view that pointed at it.
    ///
    /// The sale draft keeps its client snapshot, like any registered sale.
    pub fn delete_client(
        &mut self,
        clients: &mut ClientDirectory,
        id: &str,
        sink: &mut dyn ActivitySink,
    ) -> CoreResult<Client> {
        let removed = clients.delete(id, sink)?;
        if self.editing_client.as_deref() == Some(id) {
            self.cancel_client();
        }
        if self.viewing_client.as_deref() == Some(id) {
            self.close_client_view();
        }
        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityEvent;
    use crate::catalog::InMemoryCatalog;
    use crate::error::ValidationError;
    use crate::money::{DiscountRate, Money};
    use crate::types::{CatalogItem, PaymentStatus, StockLevel};

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(vec![CatalogItem {
            sku: "SKU123".to_string(),
            description: "Producto A".to_string(),
            unit_price: Money::from_cents(2750),
            on_hand: 8,
            stock_level: StockLevel::Normal,
            unit_cost: Some(Money::from_cents(1500)),
        }])
    }

    fn session_with_client(clients: &mut ClientDirectory) -> Session {
        let mut session = Session::new();
        session.client_form = ClientInput::named("Juan Pérez");
        session.submit_client(clients, &mut Vec::new()).unwrap();
        session
    }

    #[test]
    fn test_full_sale_flow() {
        let catalog = catalog();
        let mut clients = ClientDirectory::new();
        let mut sales = SaleBook::new();
        let mut events: Vec<ActivityEvent> = Vec::new();
        let mut session = session_with_client(&mut clients);

        session.begin_new_sale();
        assert!(session.set_entry_sku("sku123", &catalog));
        session.entry.quantity = 2;
        session.add_line(&catalog).unwrap();
        session.draft.discount = DiscountRate::from_percent(10);
        session.draft.shipping = Money::from_cents(500);
        assert_eq!(session.totals().total.cents(), 5450);

        let sale = session.submit_sale(&mut sales, &mut events).unwrap();
        assert_eq!(sale.total.cents(), 5450);
        assert_eq!(sale.client_name, "Juan Pérez");
        assert_eq!(sale.items[0].unit_cost, Some(Money::from_cents(1500)));
        assert!(session.draft.items.is_empty());
        assert!(session.draft.client.is_none());
    }

    #[test]
    fn test_new_client_is_selected_for_next_sale() {
        let mut clients = ClientDirectory::new();
        let mut session = session_with_client(&mut clients);
        session.begin_new_sale();

        let selected = session.draft.client.as_ref().unwrap();
        assert_eq!(selected.id, clients.list()[0].id);
        assert_eq!(selected.name, "Juan Pérez");
    }

    #[test]
    fn test_failed_add_line_keeps_entry() {
        let mut session = Session::new();
        session.entry = LineEntry::manual("Grip", 0, Money::from_cents(500));
        assert!(session.add_line(&catalog()).is_err());
        assert_eq!(session.entry.description, "Grip");
        assert!(session.draft.items.is_empty());
    }

    #[test]
    fn test_oversized_line_is_rejected() {
        let mut session = Session::new();
        session.entry = LineEntry::manual("Bulk", i64::MAX / 2, Money::from_cents(2750));

        let err = session.add_line(&catalog()).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "quantity"));
        assert_eq!(session.entry.quantity, i64::MAX / 2);
        assert!(session.draft.items.is_empty());

        session.entry = LineEntry::manual("Bulk", 1, Money::from_cents(i64::MAX));
        assert!(session.add_line(&catalog()).is_err());
    }

    #[test]
    fn test_remove_line() {
        let mut session = Session::new();
        session.entry = LineEntry::manual("Grip", 1, Money::from_cents(500));
        let line = session.add_line(&catalog()).unwrap();
        assert_eq!(session.entry, LineEntry::default());

        assert!(session.remove_line(&line.id));
        assert!(!session.remove_line(&line.id));
        assert!(session.draft.items.is_empty());
    }

    #[test]
    fn test_failed_submit_keeps_form() {
        let mut sales = SaleBook::new();
        let mut session = Session::new();
        session.draft.notes = Some("Gift".to_string());
        assert!(session.submit_sale(&mut sales, &mut Vec::new()).is_err());
        assert_eq!(session.draft.notes.as_deref(), Some("Gift"));
        assert!(sales.is_empty());
    }

    #[test]
    fn test_edit_prefills_and_cancel_discards() {
        let catalog = catalog();
        let mut clients = ClientDirectory::new();
        let mut sales = SaleBook::new();
        let mut session = session_with_client(&mut clients);
        session.entry = LineEntry::manual("Balls", 3, Money::from_cents(900));
        session.add_line(&catalog).unwrap();
        session.draft.notes = Some("Deliver Monday".to_string());
        let sale = session.submit_sale(&mut sales, &mut Vec::new()).unwrap();

        session.begin_edit_sale(&sale);
        assert_eq!(session.editing_sale(), Some(sale.id.as_str()));
        assert_eq!(session.draft.items, sale.items);
        assert_eq!(session.draft.notes.as_deref(), Some("Deliver Monday"));
        assert_eq!(session.draft.client.as_ref().unwrap().id, sale.client_id);

        session.draft.fulfillment.payment = PaymentStatus::Paid;
        session.draft.items.clear();
        session.cancel_sale();

        assert_eq!(session.editing_sale(), None);
        assert_eq!(sales.get(&sale.id), Some(&sale));
    }

    #[test]
    fn test_edit_submit_updates_in_place() {
        let catalog = catalog();
        let mut clients = ClientDirectory::new();
        let mut sales = SaleBook::new();
        let mut session = session_with_client(&mut clients);
        for name in ["A", "B"] {
            let client = clients.list()[0].clone();
            session.select_client(&client);
            session.entry = LineEntry::manual(name, 1, Money::from_cents(100));
            session.add_line(&catalog).unwrap();
            session.submit_sale(&mut sales, &mut Vec::new()).unwrap();
        }
        let older = sales.list()[1].clone();

        session.begin_edit_sale(&older);
        session.draft.fulfillment.payment = PaymentStatus::Paid;
        let updated = session.submit_sale(&mut sales, &mut Vec::new()).unwrap();

        assert_eq!(updated.id, older.id);
        assert_eq!(sales.position(&older.id), Some(1));
        assert_eq!(sales.len(), 2);
        assert_eq!(session.editing_sale(), None);
    }

    #[test]
    fn test_begin_new_sale_after_edit_is_blank() {
        let mut clients = ClientDirectory::new();
        let mut sales = SaleBook::new();
        let mut session = session_with_client(&mut clients);
        session.entry = LineEntry::manual("Grip", 1, Money::from_cents(500));
        session.add_line(&catalog()).unwrap();
        let sale = session.submit_sale(&mut sales, &mut Vec::new()).unwrap();

        session.begin_edit_sale(&sale);
        session.begin_new_sale();
        assert!(session.draft.client.is_none());
        assert!(session.draft.items.is_empty());
    }

    #[test]
    fn test_toggle_expansion_and_forget() {
        let mut clients = ClientDirectory::new();
        let mut sales = SaleBook::new();
        let mut session = session_with_client(&mut clients);
        session.entry = LineEntry::manual("Grip", 1, Money::from_cents(500));
        session.add_line(&catalog()).unwrap();
        let sale = session.submit_sale(&mut sales, &mut Vec::new()).unwrap();

        assert!(session.toggle_expansion(&sale.id));
        assert!(session.is_expanded(&sale.id));
        assert!(!session.toggle_expansion(&sale.id));
        assert!(session.toggle_expansion(&sale.id));

        session.begin_edit_sale(&sale);
        session.delete_sale(&mut sales, &sale.id, &mut Vec::new()).unwrap();
        assert!(!session.is_expanded(&sale.id));
        assert_eq!(session.editing_sale(), None);
        assert!(sales.is_empty());
    }

    #[test]
    fn test_client_edit_view_and_delete() {
        let mut clients = ClientDirectory::new();
        let mut session = session_with_client(&mut clients);
        let client = clients.list()[0].clone();

        session.begin_edit_client(&client);
        session.view_client(&client);
        assert_eq!(session.client_form.name, "Juan Pérez");
        session.client_form.city = "Rosario".to_string();
        let updated = session.submit_client(&mut clients, &mut Vec::new()).unwrap();
        assert_eq!(updated.city, "Rosario");
        assert_eq!(session.editing_client(), None);
        assert_eq!(clients.len(), 1);

        session.begin_edit_client(&updated);
        session
            .delete_client(&mut clients, &updated.id, &mut Vec::new())
            .unwrap();
        assert_eq!(session.editing_client(), None);
        assert_eq!(session.viewing_client(), None);
        assert!(clients.is_empty());
    }

    #[test]
    fn test_deleted_client_keeps_sale_snapshot() {
        let mut clients = ClientDirectory::new();
        let mut sales = SaleBook::new();
        let mut session = session_with_client(&mut clients);
        session.entry = LineEntry::manual("Grip", 1, Money::from_cents(500));
        session.add_line(&catalog()).unwrap();
        let sale = session.submit_sale(&mut sales, &mut Vec::new()).unwrap();

        session
            .delete_client(&mut clients, &sale.client_id, &mut Vec::new())
            .unwrap();

        let kept = sales.get(&sale.id).unwrap();
        assert_eq!(kept.client_id, sale.client_id);
        assert_eq!(kept.client_name, "Juan Pérez");
    }

    #[test]
    fn test_empty_client_name_keeps_form() {
        let mut clients = ClientDirectory::new();
        let mut session = Session::new();
        session.client_form.email = "x@example.com".to_string();
        assert!(session.submit_client(&mut clients, &mut Vec::new()).is_err());
        assert_eq!(session.client_form.email, "x@example.com");
        assert!(session.draft.client.is_none());
    }
}
