//! # Client Repository
//!
//! Persistence for the client directory: `list`, `insert`, `update`, `delete`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use backoffice_core::{Client, ClientInput};

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: String,
    name: String,
    national_id: String,
    email: String,
    phone: String,
    province: String,
    city: String,
    postal_code: String,
    address: String,
    created_at: DateTime<Utc>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            name: row.name,
            national_id: row.national_id,
            email: row.email,
            phone: row.phone,
            province: row.province,
            city: row.city,
            postal_code: row.postal_code,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

const SELECT_CLIENT: &str = r#"
    SELECT id, name, national_id, email, phone, province, city, postal_code,
           address, created_at
    FROM clients
"#;

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// All clients, newest first.
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        let rows: Vec<ClientRow> =
            sqlx::query_as(&format!("{SELECT_CLIENT} ORDER BY created_at DESC, rowid DESC"))
                .fetch_all(&self.pool)
                .await?;

        debug!(count = rows.len(), "Loaded clients");
        Ok(rows.into_iter().map(Client::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let row: Option<ClientRow> = sqlx::query_as(&format!("{SELECT_CLIENT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Client::from))
    }

    /// Inserts a client created by the directory manager (id already assigned).
    pub async fn insert(&self, client: &Client) -> DbResult<Client> {
        debug!(id = %client.id, name = %client.name, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, name, national_id, email, phone,
                province, city, postal_code, address, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.national_id)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.province)
        .bind(&client.city)
        .bind(&client.postal_code)
        .bind(&client.address)
        .bind(client.created_at)
        .execute(&self.pool)
        .await?;

        Ok(client.clone())
    }

    /// Applies the editable fields to the stored client and returns it.
    pub async fn update(&self, id: &str, patch: &ClientInput) -> DbResult<Client> {
        debug!(id = %id, "Updating client");

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                name = ?2,
                national_id = ?3,
                email = ?4,
                phone = ?5,
                province = ?6,
                city = ?7,
                postal_code = ?8,
                address = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.national_id)
        .bind(&patch.email)
        .bind(&patch.phone)
        .bind(&patch.province)
        .bind(&patch.city)
        .bind(&patch.postal_code)
        .bind(&patch.address)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Client", id))
    }

    /// Deletes a client. Sales referencing it are left untouched.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting client");

        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
