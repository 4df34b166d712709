//! # Commands Module
//!
//! Every operation the retail screen can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (gate + activity helpers)
//! ├── sale.rs     ◄─── Sale form, registration, deletion, summary
//! ├── client.rs   ◄─── Client form, deletion, listing
//! └── catalog.rs  ◄─── Catalog snapshot loading
//! ```
//!
//! ## How a Mutation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. gate         actor.can_write(Retail)?          else FORBIDDEN       │
//! │  2. core op      with_retail_mut(|r| ...)          in memory, sync      │
//! │  3. persist      db.sales().insert(..).await       skipped offline      │
//! │  4. activity     db.activity().record(..).await    failures only warn   │
//! │                                                                         │
//! │  A failed step 3 returns DATABASE_ERROR. The in-memory change from      │
//! │  step 2 stays in place.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Form edits that only touch the session (adding a pending line, toggling
//! an expansion) need no permission: nothing is stored until submit.

pub mod catalog;
pub mod client;
pub mod sale;

use tracing::warn;

use crate::error::ApiError;
use crate::state::DbState;
use backoffice_core::{ActivityEvent, Section, UserAccount};

/// Fails with `FORBIDDEN` unless the account may write retail data.
pub(crate) fn require_write(actor: &UserAccount) -> Result<(), ApiError> {
    if actor.can_write(Section::Retail) {
        Ok(())
    } else {
        warn!(user = %actor.email, "Write to retail denied");
        Err(ApiError::forbidden(Section::Retail))
    }
}

/// Fails with `FORBIDDEN` unless the account may see retail data.
pub(crate) fn require_view(actor: &UserAccount) -> Result<(), ApiError> {
    if actor.can_view(Section::Retail) {
        Ok(())
    } else {
        warn!(user = %actor.email, "Read of retail denied");
        Err(ApiError::forbidden(Section::Retail))
    }
}

/// Writes the events to the activity log. Failures are logged, never returned.
pub(crate) async fn record_activity(db: &DbState, events: &[ActivityEvent]) {
    let Some(database) = db.inner() else {
        return;
    };

    for event in events {
        if let Err(e) = database.activity().record(event).await {
            warn!(
                action = event.action.as_str(),
                entity_id = %event.entity_id,
                error = %e,
                "Activity log write failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use backoffice_core::Role;

    #[test]
    fn test_gate_by_role() {
        let admin = UserAccount::new("u1", "admin@shop.test", "Admin", Role::Admin);
        let viewer = UserAccount::new("u2", "viewer@shop.test", "Viewer", Role::Viewer);

        assert!(require_write(&admin).is_ok());
        assert!(require_view(&viewer).is_ok());
        assert_eq!(require_write(&viewer).unwrap_err().code, ErrorCode::Forbidden);
    }

    #[test]
    fn test_inactive_account_is_locked_out() {
        let mut user = UserAccount::new("u3", "old@shop.test", "Old", Role::Admin);
        user.is_active = false;

        assert!(require_view(&user).is_err());
        assert!(require_write(&user).is_err());
    }
}
