//! End-to-end flows through the commands, against an in-memory SQLite
//! database and in offline mode.

use backoffice_app::commands::{catalog, client, sale};
use backoffice_app::error::ErrorCode;
use backoffice_app::state::{ConfigState, DbState};
use backoffice_app::Backoffice;
use backoffice_core::{
    ActivityAction, CatalogItem, ClientInput, Fulfillment, Money, PaymentStatus, Role,
    StockLevel, UserAccount,
};
use backoffice_db::{Database, DbConfig};
use chrono::NaiveDate;

fn admin() -> UserAccount {
    UserAccount::new("u-admin", "admin@shop.test", "Admin", Role::Admin)
}

fn viewer() -> UserAccount {
    UserAccount::new("u-viewer", "viewer@shop.test", "Viewer", Role::Viewer)
}

async fn online_app() -> Backoffice {
    let database = Database::new(DbConfig::in_memory()).await.unwrap();
    database
        .catalog()
        .upsert(&CatalogItem {
            sku: "SKU123".to_string(),
            description: "Producto A".to_string(),
            unit_price: Money::from_cents(2750),
            on_hand: 10,
            stock_level: StockLevel::Normal,
            unit_cost: Some(Money::from_cents(1500)),
        })
        .await
        .unwrap();

    Backoffice::load(ConfigState::default(), DbState::new(database))
        .await
        .unwrap()
}

fn details(discount_bps: u32, shipping_cents: i64) -> sale::SaleDetails {
    sale::SaleDetails {
        date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        discount_bps,
        shipping_cents,
        fulfillment: Fulfillment::default(),
        tracking_number: None,
        package_count: None,
        notes: None,
    }
}

/// Adds one catalog line (autofilled) with the given quantity.
fn add_catalog_line(app: &Backoffice, quantity: i64) {
    let entry = sale::set_entry_sku(&app.retail, "sku123");
    assert!(entry.autofilled);
    sale::set_entry_fields(
        &app.retail,
        sale::EntryFields {
            description: entry.description,
            quantity,
            unit_price_cents: entry.unit_price_cents,
        },
    );
    sale::add_line(&app.retail).unwrap();
}

async fn register_for_new_client(app: &Backoffice, name: &str) -> sale::SaleResponse {
    client::submit_client(&admin(), &app.db, &app.retail, ClientInput::named(name))
        .await
        .unwrap();
    sale::begin_new_sale(&app.retail);
    add_catalog_line(app, 2);
    sale::set_sale_details(&app.retail, details(1000, 500));
    sale::register_sale(&admin(), &app.db, &app.retail)
        .await
        .unwrap()
}

#[tokio::test]
async fn register_sale_end_to_end() {
    let app = online_app().await;

    let response = register_for_new_client(&app, "Juan Pérez").await;
    assert_eq!(response.subtotal_cents, 5500);
    assert_eq!(response.total_cents, 5450);
    assert_eq!(response.client_name, "Juan Pérez");
    assert!(response.persisted);

    let database = app.db.inner().unwrap();
    let stored = database
        .sales()
        .get_by_id(&response.sale_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.total, Money::from_cents(5450));
    assert_eq!(stored.items.len(), 1);
    assert_eq!(stored.items[0].unit_cost, Some(Money::from_cents(1500)));
    assert_eq!(stored.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());

    let actions: Vec<ActivityAction> = database
        .activity()
        .recent(10)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert!(actions.contains(&ActivityAction::CreateRetailClient));
    assert!(actions.contains(&ActivityAction::CreateRetailSale));
}

#[tokio::test]
async fn new_client_is_selected_for_next_sale() {
    let app = online_app().await;

    let created = client::submit_client(
        &admin(),
        &app.db,
        &app.retail,
        ClientInput::named("María García"),
    )
    .await
    .unwrap();

    let draft = sale::begin_new_sale(&app.retail);
    assert_eq!(draft.client_id.as_deref(), Some(created.client.id.as_str()));
    assert_eq!(draft.client_name.as_deref(), Some("María García"));
}

#[tokio::test]
async fn sale_without_lines_or_client_is_rejected() {
    let app = online_app().await;

    let err = sale::register_sale(&admin(), &app.db, &app.retail)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    client::submit_client(&admin(), &app.db, &app.retail, ClientInput::named("Ana"))
        .await
        .unwrap();
    let err = sale::register_sale(&admin(), &app.db, &app.retail)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    assert_eq!(app.db.inner().unwrap().sales().count().await.unwrap(), 0);
}

#[tokio::test]
async fn out_of_range_discount_keeps_form() {
    let app = online_app().await;
    client::submit_client(&admin(), &app.db, &app.retail, ClientInput::named("Ana"))
        .await
        .unwrap();
    add_catalog_line(&app, 1);
    sale::set_sale_details(&app.retail, details(15_000, 0));

    let err = sale::register_sale(&admin(), &app.db, &app.retail)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let draft = sale::get_draft(&app.retail);
    assert_eq!(draft.line_count, 1);
    assert_eq!(draft.client_name.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn edit_keeps_position_and_updates_database() {
    let app = online_app().await;
    let first = register_for_new_client(&app, "Juan").await;
    let second = register_for_new_client(&app, "María").await;

    let draft = sale::begin_edit_sale(&app.retail, &first.sale_id).unwrap();
    assert_eq!(draft.editing_sale_id.as_deref(), Some(first.sale_id.as_str()));
    assert_eq!(draft.total_cents, 5450);

    sale::set_sale_details(
        &app.retail,
        sale::SaleDetails {
            fulfillment: Fulfillment {
                payment: PaymentStatus::Paid,
                ..Fulfillment::default()
            },
            ..details(0, 0)
        },
    );
    let edited = sale::register_sale(&admin(), &app.db, &app.retail)
        .await
        .unwrap();
    assert!(edited.updated);
    assert_eq!(edited.sale_id, first.sale_id);
    assert_eq!(edited.total_cents, 5500);

    let ids: Vec<String> = sale::list_sales(&admin(), &app.retail, &Default::default())
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![second.sale_id.clone(), first.sale_id.clone()]);

    let stored = app
        .db
        .inner()
        .unwrap()
        .sales()
        .get_by_id(&first.sale_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.total, Money::from_cents(5500));
    assert_eq!(stored.fulfillment.payment, PaymentStatus::Paid);

    let summary = sale::sales_summary(&admin(), &app.retail, &app.config).unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.paid, 1);
    assert_eq!(summary.revenue_cents, 5500 + 5450);
    assert_eq!(summary.revenue_display, "$109.50");
}

#[tokio::test]
async fn cancel_edit_leaves_sale_untouched() {
    let app = online_app().await;
    let registered = register_for_new_client(&app, "Juan").await;

    sale::begin_edit_sale(&app.retail, &registered.sale_id).unwrap();
    sale::set_sale_details(&app.retail, details(5000, 0));
    let draft = sale::cancel_sale(&app.retail);
    assert!(draft.editing_sale_id.is_none());
    assert_eq!(draft.line_count, 0);

    let sales = sale::list_sales(&admin(), &app.retail, &Default::default()).unwrap();
    assert_eq!(sales[0].total, Money::from_cents(5450));
}

#[tokio::test]
async fn delete_sale_removes_exactly_one() {
    let app = online_app().await;
    let first = register_for_new_client(&app, "Juan").await;
    let second = register_for_new_client(&app, "María").await;
    assert!(sale::toggle_expansion(&app.retail, &first.sale_id));

    sale::delete_sale(&admin(), &app.db, &app.retail, &first.sale_id)
        .await
        .unwrap();

    let remaining = sale::list_sales(&admin(), &app.retail, &Default::default()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.sale_id);
    assert_eq!(app.db.inner().unwrap().sales().count().await.unwrap(), 1);
    assert!(!app.retail.with_retail(|r| r.session.is_expanded(&first.sale_id)));

    let err = sale::delete_sale(&admin(), &app.db, &app.retail, &first.sale_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(app.db.inner().unwrap().sales().count().await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_client_keeps_sale_snapshot() {
    let app = online_app().await;
    let registered = register_for_new_client(&app, "Juan Pérez").await;
    let client_id = app
        .retail
        .with_retail(|r| r.sales.get(&registered.sale_id).unwrap().client_id.clone());

    client::delete_client(&admin(), &app.db, &app.retail, &client_id)
        .await
        .unwrap();

    assert!(client::list_clients(&admin(), &app.retail, None)
        .unwrap()
        .is_empty());

    let stored = app
        .db
        .inner()
        .unwrap()
        .sales()
        .get_by_id(&registered.sale_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.client_id, client_id);
    assert_eq!(stored.client_name, "Juan Pérez");
}

#[tokio::test]
async fn viewer_cannot_mutate() {
    let app = online_app().await;

    let err = client::submit_client(&viewer(), &app.db, &app.retail, ClientInput::named("X"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);

    let err = sale::delete_sale(&viewer(), &app.db, &app.retail, "any")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);

    assert!(client::list_clients(&viewer(), &app.retail, None)
        .unwrap()
        .is_empty());
    assert_eq!(app.db.inner().unwrap().clients().count().await.unwrap(), 0);
}

#[tokio::test]
async fn reload_sees_stored_data() {
    let app = online_app().await;
    let registered = register_for_new_client(&app, "Juan").await;

    let reloaded = Backoffice::load(ConfigState::default(), app.db.clone())
        .await
        .unwrap();

    let (sales, clients, catalog) = reloaded
        .retail
        .with_retail(|r| (r.sales.len(), r.clients.len(), r.catalog.len()));
    assert_eq!((sales, clients, catalog), (1, 1, 1));
    assert!(reloaded
        .retail
        .with_retail(|r| r.sales.get(&registered.sale_id).is_some()));
}

#[tokio::test]
async fn failed_write_keeps_memory_state() {
    let app = online_app().await;
    client::submit_client(&admin(), &app.db, &app.retail, ClientInput::named("Juan"))
        .await
        .unwrap();
    add_catalog_line(&app, 1);

    app.db.inner().unwrap().close().await;

    let err = sale::register_sale(&admin(), &app.db, &app.retail)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);
    assert_eq!(app.retail.with_retail(|r| r.sales.len()), 1);
}

#[tokio::test]
async fn offline_flow_without_database() {
    let config = ConfigState {
        offline: true,
        ..ConfigState::default()
    };
    let app = backoffice_app::bootstrap(config).await.unwrap();

    let loaded = catalog::load_catalog(&app.db, &app.retail).await.unwrap();
    assert!(!loaded.refreshed);

    client::submit_client(&admin(), &app.db, &app.retail, ClientInput::named("Lucía"))
        .await
        .unwrap();
    sale::set_entry_fields(
        &app.retail,
        sale::EntryFields {
            description: "Envoltorio de regalo".to_string(),
            quantity: 1,
            unit_price_cents: 300,
        },
    );
    let line = sale::add_line(&app.retail).unwrap();
    assert_eq!(line.line.sku, "MANUAL");
    assert_eq!(line.line.unit_cost, None);

    let registered = sale::register_sale(&admin(), &app.db, &app.retail)
        .await
        .unwrap();
    assert!(!registered.persisted);
    assert_eq!(registered.total_cents, 300);
}
