//! # Activity Log Repository
//!
//! Append-only store for [`ActivityEvent`]s. Before/after states are kept as
//! JSON text.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use backoffice_core::{ActivityAction, ActivityEvent};

#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    action: String,
    entity_type: String,
    entity_id: String,
    before_json: Option<String>,
    after_json: Option<String>,
    description: String,
    occurred_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for ActivityEvent {
    type Error = serde_json::Error;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let action: ActivityAction = serde_json::from_value(Value::String(row.action))?;
        let parse = |json: Option<String>| -> Result<Option<Value>, serde_json::Error> {
            json.map(|j| serde_json::from_str(&j)).transpose()
        };

        Ok(ActivityEvent {
            action,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            before: parse(row.before_json)?,
            after: parse(row.after_json)?,
            description: row.description,
            occurred_at: row.occurred_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: SqlitePool,
}

impl ActivityLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ActivityLogRepository { pool }
    }

    /// Appends an event and returns the id of the stored entry.
    pub async fn record(&self, event: &ActivityEvent) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        debug!(
            action = event.action.as_str(),
            entity_id = %event.entity_id,
            "Recording activity"
        );

        let before = event.before.as_ref().map(serde_json::to_string).transpose()?;
        let after = event.after.as_ref().map(serde_json::to_string).transpose()?;

        sqlx::query(
            r#"
            INSERT INTO activity_log (
                id, action, entity_type, entity_id,
                before_json, after_json, description, occurred_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&id)
        .bind(event.action.as_str())
        .bind(&event.entity_type)
        .bind(&event.entity_id)
        .bind(before)
        .bind(after)
        .bind(&event.description)
        .bind(event.occurred_at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// The latest `limit` events, newest first.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<ActivityEvent>> {
        let rows: Vec<ActivityRow> = sqlx::query_as(
            r#"
            SELECT action, entity_type, entity_id, before_json, after_json,
                   description, occurred_at
            FROM activity_log
            ORDER BY occurred_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let events = rows
            .into_iter()
            .map(ActivityEvent::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }
}
