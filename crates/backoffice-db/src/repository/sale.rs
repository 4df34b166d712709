//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! ## Write Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  insert(sale)                 update(sale)                              │
//! │  ┌──────── TX ────────┐       ┌──────── TX ─────────────────┐           │
//! │  │ INSERT sales       │       │ UPDATE sales (NotFound?)    │           │
//! │  │ INSERT sale_items… │       │ DELETE sale_items           │           │
//! │  └────────────────────┘       │ INSERT sale_items…          │           │
//! │                               └─────────────────────────────┘           │
//! │  delete(id): DELETE sales ──► sale_items go via ON DELETE CASCADE      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are stored with their position so a sale reads back in entry order.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use backoffice_core::{
    DeliveryStatus, DiscountRate, Fulfillment, Money, PaymentStatus, Sale, SaleLineItem,
    StockStatus,
};

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    date: NaiveDate,
    client_id: String,
    client_name: String,
    subtotal_cents: i64,
    discount_bps: u32,
    shipping_cents: i64,
    total_cents: i64,
    stock_status: StockStatus,
    payment_status: PaymentStatus,
    delivery_status: DeliveryStatus,
    tracking_number: Option<String>,
    package_count: Option<u32>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_sale(self, items: Vec<SaleLineItem>) -> Sale {
        Sale {
            id: self.id,
            date: self.date,
            client_id: self.client_id,
            client_name: self.client_name,
            items,
            subtotal: Money::from_cents(self.subtotal_cents),
            discount: DiscountRate::from_bps(self.discount_bps),
            shipping: Money::from_cents(self.shipping_cents),
            total: Money::from_cents(self.total_cents),
            fulfillment: Fulfillment {
                stock: self.stock_status,
                payment: self.payment_status,
                delivery: self.delivery_status,
            },
            tracking_number: self.tracking_number,
            package_count: self.package_count,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    id: String,
    sale_id: String,
    sku: String,
    description: String,
    quantity: i64,
    unit_price_cents: i64,
    line_total_cents: i64,
    unit_cost_cents: Option<i64>,
}

impl From<SaleItemRow> for SaleLineItem {
    fn from(row: SaleItemRow) -> Self {
        SaleLineItem {
            id: row.id,
            sku: row.sku,
            description: row.description,
            quantity: row.quantity,
            unit_price: Money::from_cents(row.unit_price_cents),
            line_total: Money::from_cents(row.line_total_cents),
            unit_cost: row.unit_cost_cents.map(Money::from_cents),
        }
    }
}

const SELECT_SALE: &str = r#"
    SELECT id, date, client_id, client_name,
           subtotal_cents, discount_bps, shipping_cents, total_cents,
           stock_status, payment_status, delivery_status,
           tracking_number, package_count, notes,
           created_at, updated_at
    FROM sales
"#;

const SELECT_ITEM: &str = r#"
    SELECT id, sale_id, sku, description, quantity,
           unit_price_cents, line_total_cents, unit_cost_cents
    FROM sale_items
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// All sales with their items, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let rows: Vec<SaleRow> =
            sqlx::query_as(&format!("{SELECT_SALE} ORDER BY created_at DESC, rowid DESC"))
                .fetch_all(&self.pool)
                .await?;

        let items: Vec<SaleItemRow> =
            sqlx::query_as(&format!("{SELECT_ITEM} ORDER BY sale_id, position"))
                .fetch_all(&self.pool)
                .await?;

        let mut by_sale: HashMap<String, Vec<SaleLineItem>> = HashMap::new();
        for item in items {
            by_sale
                .entry(item.sale_id.clone())
                .or_default()
                .push(SaleLineItem::from(item));
        }

        debug!(count = rows.len(), "Loaded sales");

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = by_sale.remove(&row.id).unwrap_or_default();
                row.into_sale(items)
            })
            .collect())
    }

    /// Gets a sale with its items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as(&format!("{SELECT_SALE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items: Vec<SaleItemRow> =
            sqlx::query_as(&format!("{SELECT_ITEM} WHERE sale_id = ?1 ORDER BY position"))
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        Ok(Some(
            row.into_sale(items.into_iter().map(SaleLineItem::from).collect()),
        ))
    }

    /// Inserts a registered sale and its items in one transaction.
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, items = sale.items.len(), total = %sale.total, "Inserting sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, date, client_id, client_name,
                subtotal_cents, discount_bps, shipping_cents, total_cents,
                stock_status, payment_status, delivery_status,
                tracking_number, package_count, notes,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11,
                ?12, ?13, ?14,
                ?15, ?16
            )
            "#,
        )
        .bind(&sale.id)
        .bind(sale.date)
        .bind(&sale.client_id)
        .bind(&sale.client_name)
        .bind(sale.subtotal.cents())
        .bind(sale.discount.bps())
        .bind(sale.shipping.cents())
        .bind(sale.total.cents())
        .bind(sale.fulfillment.stock)
        .bind(sale.fulfillment.payment)
        .bind(sale.fulfillment.delivery)
        .bind(&sale.tracking_number)
        .bind(sale.package_count)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_items(&mut tx, &sale.id, &sale.items).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    /// Overwrites a sale's fields and replaces its items in one transaction.
    pub async fn update(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, items = sale.items.len(), total = %sale.total, "Updating sale");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                date = ?2,
                client_id = ?3,
                client_name = ?4,
                subtotal_cents = ?5,
                discount_bps = ?6,
                shipping_cents = ?7,
                total_cents = ?8,
                stock_status = ?9,
                payment_status = ?10,
                delivery_status = ?11,
                tracking_number = ?12,
                package_count = ?13,
                notes = ?14,
                updated_at = ?15
            WHERE id = ?1
            "#,
        )
        .bind(&sale.id)
        .bind(sale.date)
        .bind(&sale.client_id)
        .bind(&sale.client_name)
        .bind(sale.subtotal.cents())
        .bind(sale.discount.bps())
        .bind(sale.shipping.cents())
        .bind(sale.total.cents())
        .bind(sale.fulfillment.stock)
        .bind(sale.fulfillment.payment)
        .bind(sale.fulfillment.delivery)
        .bind(&sale.tracking_number)
        .bind(sale.package_count)
        .bind(&sale.notes)
        .bind(sale.updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", &sale.id));
        }

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(&sale.id)
            .execute(&mut *tx)
            .await?;

        insert_items(&mut tx, &sale.id, &sale.items).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    /// Deletes a sale; its items go with it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

async fn insert_items(
    conn: &mut SqliteConnection,
    sale_id: &str,
    items: &[SaleLineItem],
) -> DbResult<()> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO sale_items (
                id, sale_id, position, sku, description, quantity,
                unit_price_cents, line_total_cents, unit_cost_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&item.id)
        .bind(sale_id)
        .bind(position as i64)
        .bind(&item.sku)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.unit_price.cents())
        .bind(item.line_total.cents())
        .bind(item.unit_cost.map(|c| c.cents()))
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Duration;

    fn line(id: &str, sku: &str, qty: i64, price: i64, cost: Option<i64>) -> SaleLineItem {
        SaleLineItem {
            id: id.to_string(),
            sku: sku.to_string(),
            description: format!("Product {sku}"),
            quantity: qty,
            unit_price: Money::from_cents(price),
            line_total: Money::from_cents(qty * price),
            unit_cost: cost.map(Money::from_cents),
        }
    }

    fn sale(id: &str, age_days: i64, items: Vec<SaleLineItem>) -> Sale {
        let created = Utc::now() - Duration::days(age_days);
        let subtotal: Money = items.iter().map(|i| i.line_total).sum();
        Sale {
            id: id.to_string(),
            date: created.date_naive(),
            client_id: "c1".to_string(),
            client_name: "Juan Pérez".to_string(),
            items,
            subtotal,
            discount: DiscountRate::from_percent(10),
            shipping: Money::from_cents(500),
            total: subtotal - subtotal.discount_amount(DiscountRate::from_percent(10))
                + Money::from_cents(500),
            fulfillment: Fulfillment::default(),
            tracking_number: None,
            package_count: Some(1),
            notes: Some("Leave at the door".to_string()),
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();
        let original = sale(
            "s1",
            0,
            vec![
                line("l1", "SKU123", 2, 2750, Some(1500)),
                line("l2", "MANUAL", 1, 300, None),
            ],
        );

        repo.insert(&original).await.unwrap();
        let loaded = repo.get_by_id("s1").await.unwrap().unwrap();

        assert_eq!(loaded, original);
        assert_eq!(loaded.items[0].id, "l1");
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();
        repo.insert(&sale("old", 3, vec![line("a", "A", 1, 100, None)]))
            .await
            .unwrap();
        repo.insert(&sale("new", 0, vec![line("b", "B", 2, 100, None)]))
            .await
            .unwrap();

        let sales = repo.list().await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].id, "new");
        assert_eq!(sales[0].items[0].quantity, 2);
        assert_eq!(sales[1].items[0].sku, "A");
    }

    #[tokio::test]
    async fn test_update_replaces_items_and_statuses() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();
        let mut s = sale("s1", 0, vec![line("l1", "A", 1, 100, None)]);
        repo.insert(&s).await.unwrap();

        s.items = vec![line("l2", "B", 3, 200, Some(50))];
        s.subtotal = Money::from_cents(600);
        s.total = Money::from_cents(1040);
        s.fulfillment.payment = PaymentStatus::Paid;
        s.fulfillment.stock = StockStatus::Deducted;
        s.tracking_number = Some("CA123456789AR".to_string());
        repo.update(&s).await.unwrap();

        let loaded = repo.get_by_id("s1").await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].id, "l2");
        assert_eq!(loaded.fulfillment.payment, PaymentStatus::Paid);
        assert_eq!(loaded.fulfillment.stock, StockStatus::Deducted);
        assert_eq!(loaded.fulfillment.delivery, DeliveryStatus::Pending);
        assert_eq!(loaded.tracking_number.as_deref(), Some("CA123456789AR"));
    }

    #[tokio::test]
    async fn test_update_missing_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .sales()
            .update(&sale("ghost", 0, vec![line("l1", "A", 1, 100, None)]))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();
        repo.insert(&sale("s1", 0, vec![line("l1", "A", 1, 100, None)]))
            .await
            .unwrap();

        repo.delete("s1").await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
        assert!(repo.delete("s1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_check_constraint_rejects_bad_discount() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut s = sale("s1", 0, vec![line("l1", "A", 1, 100, None)]);
        s.discount = DiscountRate::from_percent(150);

        let err = db.sales().insert(&s).await.unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }
}
