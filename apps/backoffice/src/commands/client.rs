//! # Client Commands

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{record_activity, require_view, require_write};
use crate::error::ApiError;
use crate::state::{DbState, RetailState};
use backoffice_core::{Client, ClientInput, UserAccount};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub client: Client,
    /// `false` when an existing client was edited.
    pub created: bool,
    pub persisted: bool,
}

// =============================================================================
// Client Form
// =============================================================================

pub fn begin_new_client(retail: &RetailState) {
    retail.with_retail_mut(|r| r.session.begin_new_client());
}

/// Loads a client into the form and returns the pre-filled fields.
pub fn begin_edit_client(retail: &RetailState, client_id: &str) -> Result<ClientInput, ApiError> {
    debug!(client_id = %client_id, "begin_edit_client command");
    retail.with_retail_mut(|r| -> Result<ClientInput, ApiError> {
        let client = r
            .clients
            .get(client_id)
            .ok_or_else(|| ApiError::not_found("Client", client_id))?;
        r.session.begin_edit_client(client);
        Ok(r.session.client_form.clone())
    })
}

pub fn cancel_client(retail: &RetailState) {
    retail.with_retail_mut(|r| r.session.cancel_client());
}

/// Opens the read-only detail view of a client.
pub fn view_client(retail: &RetailState, client_id: &str) -> Result<Client, ApiError> {
    retail.with_retail_mut(|r| -> Result<Client, ApiError> {
        let client = r
            .clients
            .get(client_id)
            .ok_or_else(|| ApiError::not_found("Client", client_id))?;
        r.session.view_client(client);
        Ok(client.clone())
    })
}

pub fn close_client_view(retail: &RetailState) {
    retail.with_retail_mut(|r| r.session.close_client_view());
}

// =============================================================================
// Mutations
// =============================================================================

/// Submits the client form with `input`.
///
/// Creates a client (and selects it for the sale form), or updates the one
/// being edited. A rejected submit keeps `input` in the form.
pub async fn submit_client(
    actor: &UserAccount,
    db: &DbState,
    retail: &RetailState,
    input: ClientInput,
) -> Result<ClientResponse, ApiError> {
    debug!(user = %actor.email, name = %input.name, "submit_client command");
    require_write(actor)?;

    let mut events = Vec::new();
    let (client, created) = retail.with_retail_mut(|r| {
        r.session.client_form = input;
        let created = r.session.editing_client().is_none();
        r.session
            .submit_client(&mut r.clients, &mut events)
            .map(|client| (client, created))
    })?;

    let persisted = match db.inner() {
        Some(database) => {
            let repo = database.clients();
            let result = if created {
                repo.insert(&client).await
            } else {
                match repo.update(&client.id, &client.to_input()).await {
                    Err(e) if e.is_not_found() => repo.insert(&client).await,
                    other => other,
                }
            };

            if let Err(e) = result {
                warn!(client_id = %client.id, error = %e, "Client kept in memory only");
                return Err(e.into());
            }

            record_activity(db, &events).await;
            true
        }
        None => false,
    };

    info!(client_id = %client.id, name = %client.name, created, "Client saved");

    Ok(ClientResponse {
        client,
        created,
        persisted,
    })
}

/// Deletes a client. Sales keep their client snapshot.
pub async fn delete_client(
    actor: &UserAccount,
    db: &DbState,
    retail: &RetailState,
    client_id: &str,
) -> Result<(), ApiError> {
    debug!(user = %actor.email, client_id = %client_id, "delete_client command");
    require_write(actor)?;

    let mut events = Vec::new();
    retail.with_retail_mut(|r| r.session.delete_client(&mut r.clients, client_id, &mut events))?;

    if let Some(database) = db.inner() {
        match database.clients().delete(client_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!(client_id = %client_id, "Client was never stored");
            }
            Err(e) => {
                warn!(client_id = %client_id, error = %e, "Client removed from memory only");
                return Err(e.into());
            }
        }
        record_activity(db, &events).await;
    }

    info!(client_id = %client_id, "Client deleted");
    Ok(())
}

// =============================================================================
// Queries
// =============================================================================

/// Clients newest first, optionally narrowed by a search over name,
/// national id and email.
pub fn list_clients(
    actor: &UserAccount,
    retail: &RetailState,
    query: Option<&str>,
) -> Result<Vec<Client>, ApiError> {
    require_view(actor)?;
    Ok(retail.with_retail(|r| {
        r.clients
            .search(query.unwrap_or_default())
            .into_iter()
            .cloned()
            .collect()
    }))
}
