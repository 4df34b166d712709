//! # Activity Events
//!
//! Every successful client or sale mutation produces an [`ActivityEvent`]
//! carrying the before/after state. The managers hand events to an
//! [`ActivitySink`]; where they end up (a table, a log, nowhere) is the
//! caller's business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    CreateRetailClient,
    UpdateRetailClient,
    DeleteRetailClient,
    CreateRetailSale,
    UpdateRetailSale,
    DeleteRetailSale,
}

impl ActivityAction {
    /// Stable string form, used as the stored action kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::CreateRetailClient => "CREATE_RETAIL_CLIENT",
            ActivityAction::UpdateRetailClient => "UPDATE_RETAIL_CLIENT",
            ActivityAction::DeleteRetailClient => "DELETE_RETAIL_CLIENT",
            ActivityAction::CreateRetailSale => "CREATE_RETAIL_SALE",
            ActivityAction::UpdateRetailSale => "UPDATE_RETAIL_SALE",
            ActivityAction::DeleteRetailSale => "DELETE_RETAIL_SALE",
        }
    }

    /// Table-style name of the affected entity.
    pub fn entity_type(&self) -> &'static str {
        match self {
            ActivityAction::CreateRetailClient
            | ActivityAction::UpdateRetailClient
            | ActivityAction::DeleteRetailClient => "retail_clients",
            ActivityAction::CreateRetailSale
            | ActivityAction::UpdateRetailSale
            | ActivityAction::DeleteRetailSale => "retail_sales",
        }
    }

    /// Default human description.
    pub fn description(&self) -> &'static str {
        match self {
            ActivityAction::CreateRetailClient => "Retail client created",
            ActivityAction::UpdateRetailClient => "Retail client updated",
            ActivityAction::DeleteRetailClient => "Retail client deleted",
            ActivityAction::CreateRetailSale => "Retail sale registered",
            ActivityAction::UpdateRetailSale => "Retail sale updated",
            ActivityAction::DeleteRetailSale => "Retail sale deleted",
        }
    }
}

/// One entry for the activity log collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub action: ActivityAction,
    pub entity_type: String,
    pub entity_id: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

impl ActivityEvent {
    /// Builds an event, serializing the before/after states to JSON.
    pub fn new<T: Serialize>(
        action: ActivityAction,
        entity_id: impl Into<String>,
        before: Option<&T>,
        after: Option<&T>,
    ) -> Self {
        ActivityEvent {
            action,
            entity_type: action.entity_type().to_string(),
            entity_id: entity_id.into(),
            before: before.and_then(|b| serde_json::to_value(b).ok()),
            after: after.and_then(|a| serde_json::to_value(a).ok()),
            description: action.description().to_string(),
            occurred_at: Utc::now(),
        }
    }
}

/// Receives activity events from the managers.
pub trait ActivitySink {
    fn record(&mut self, event: ActivityEvent);
}

/// Collects events in memory; the app drains it after each command.
impl ActivitySink for Vec<ActivityEvent> {
    fn record(&mut self, event: ActivityEvent) {
        self.push(event);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoActivity;

impl ActivitySink for NoActivity {
    fn record(&mut self, _event: ActivityEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_captures_before_and_after() {
        let before = json!({"name": "Juan"});
        let after = json!({"name": "Juan Pérez"});
        let event = ActivityEvent::new(
            ActivityAction::UpdateRetailClient,
            "c1",
            Some(&before),
            Some(&after),
        );

        assert_eq!(event.entity_type, "retail_clients");
        assert_eq!(event.before, Some(before));
        assert_eq!(event.after, Some(after));
        assert_eq!(event.description, "Retail client updated");
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<ActivityEvent> = Vec::new();
        sink.record(ActivityEvent::new::<Value>(
            ActivityAction::DeleteRetailSale,
            "s1",
            None,
            None,
        ));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].action.as_str(), "DELETE_RETAIL_SALE");
        assert_eq!(sink[0].entity_type, "retail_sales");
    }
}
