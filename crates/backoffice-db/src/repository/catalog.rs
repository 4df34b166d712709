//! # Catalog Repository
//!
//! Stored snapshot of the inventory catalog. The sales core never writes to
//! it; `upsert` exists for the seed binary and catalog imports.
//!
//! The `sku` column is `COLLATE NOCASE`, so lookups and conflicts ignore case.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use backoffice_core::{CatalogItem, Money, StockLevel};

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    sku: String,
    description: String,
    unit_price_cents: i64,
    on_hand: i64,
    stock_level: StockLevel,
    unit_cost_cents: Option<i64>,
}

impl From<CatalogRow> for CatalogItem {
    fn from(row: CatalogRow) -> Self {
        CatalogItem {
            sku: row.sku,
            description: row.description,
            unit_price: Money::from_cents(row.unit_price_cents),
            on_hand: row.on_hand,
            stock_level: row.stock_level,
            unit_cost: row.unit_cost_cents.map(Money::from_cents),
        }
    }
}

const SELECT_ITEM: &str = r#"
    SELECT sku, description, unit_price_cents, on_hand, stock_level, unit_cost_cents
    FROM catalog_items
"#;

#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Every catalog item, ordered by sku.
    pub async fn list(&self) -> DbResult<Vec<CatalogItem>> {
        let rows: Vec<CatalogRow> = sqlx::query_as(&format!("{SELECT_ITEM} ORDER BY sku"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded catalog");
        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }

    /// Case-insensitive exact sku lookup.
    pub async fn lookup_by_sku(&self, sku: &str) -> DbResult<Option<CatalogItem>> {
        let sku = sku.trim();
        debug!(sku = %sku, "Catalog lookup");

        let row: Option<CatalogRow> = sqlx::query_as(&format!("{SELECT_ITEM} WHERE sku = ?1"))
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CatalogItem::from))
    }

    /// Inserts an item or replaces the one with the same sku (any case).
    pub async fn upsert(&self, item: &CatalogItem) -> DbResult<()> {
        debug!(sku = %item.sku, "Upserting catalog item");

        sqlx::query(
            r#"
            INSERT INTO catalog_items (
                sku, description, unit_price_cents, on_hand,
                stock_level, unit_cost_cents, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (sku) DO UPDATE SET
                description = excluded.description,
                unit_price_cents = excluded.unit_price_cents,
                on_hand = excluded.on_hand,
                stock_level = excluded.stock_level,
                unit_cost_cents = excluded.unit_cost_cents,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&item.sku)
        .bind(&item.description)
        .bind(item.unit_price.cents())
        .bind(item.on_hand)
        .bind(item.stock_level)
        .bind(item.unit_cost.map(|c| c.cents()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn item(sku: &str, price: i64) -> CatalogItem {
        CatalogItem {
            sku: sku.to_string(),
            description: format!("Item {sku}"),
            unit_price: Money::from_cents(price),
            on_hand: 7,
            stock_level: StockLevel::Normal,
            unit_cost: Some(Money::from_cents(price / 2)),
        }
    }

    #[tokio::test]
    async fn test_lookup_ignores_case() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();
        repo.upsert(&item("SKU123", 2750)).await.unwrap();

        let found = repo.lookup_by_sku("sku123").await.unwrap().unwrap();
        assert_eq!(found.sku, "SKU123");
        assert_eq!(found.unit_price.cents(), 2750);
        assert_eq!(found.unit_cost, Some(Money::from_cents(1375)));
        assert!(repo.lookup_by_sku("SKU999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_sku() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();
        repo.upsert(&item("SKU123", 2750)).await.unwrap();

        let mut changed = item("sku123", 3000);
        changed.stock_level = StockLevel::Missing;
        repo.upsert(&changed).await.unwrap();

        let items = repo.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price.cents(), 3000);
        assert_eq!(items[0].stock_level, StockLevel::Missing);
    }
}
