//! # Client Directory Manager
//!
//! Create, update, delete and list retail clients. The directory is ordered
//! newest first by creation time.
//!
//! Deleting a client never touches sales: a sale keeps the id and name it
//! copied at registration, even when that id no longer resolves here.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::activity::{ActivityAction, ActivityEvent, ActivitySink};
use crate::error::{CoreError, CoreResult};
use crate::types::{Client, ClientInput};
use crate::validation::validate_client_name;

/// The client collection, newest first.
#[derive(Debug, Clone, Default)]
pub struct ClientDirectory {
    clients: Vec<Client>,
}

impl ClientDirectory {
    pub fn new() -> Self {
        ClientDirectory::default()
    }

    /// Builds a directory from any list of clients, sorting newest first.
    pub fn from_clients(clients: Vec<Client>) -> Self {
        let mut directory = ClientDirectory::new();
        directory.replace_all(clients);
        directory
    }

    /// Replaces the whole collection (e.g. after reloading from storage).
    pub fn replace_all(&mut self, mut clients: Vec<Client>) {
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.clients = clients;
    }

    pub fn list(&self) -> &[Client] {
        &self.clients
    }

    pub fn get(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Case-insensitive search over name, national id and email.
    pub fn search(&self, query: &str) -> Vec<&Client> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.clients.iter().collect();
        }

        self.clients
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&query)
                    || c.national_id.to_lowercase().contains(&query)
                    || c.email.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Creates a client.
    ///
    /// ## Errors
    /// `Validation` when the name is empty or too long.
    pub fn create(&mut self, input: ClientInput, sink: &mut dyn ActivitySink) -> CoreResult<Client> {
        validate_client_name(&input.name)?;

        let client = apply_input(
            Client {
                id: self.next_id(),
                name: String::new(),
                national_id: String::new(),
                email: String::new(),
                phone: String::new(),
                province: String::new(),
                city: String::new(),
                postal_code: String::new(),
                address: String::new(),
                created_at: Utc::now(),
            },
            input,
        );

        debug!(id = %client.id, name = %client.name, "Client created");

        self.clients.insert(0, client.clone());
        sink.record(ActivityEvent::new(
            ActivityAction::CreateRetailClient,
            &client.id,
            None,
            Some(&client),
        ));
        Ok(client)
    }

    /// Replaces the editable fields of a client. Id and creation time stay.
    pub fn update(
        &mut self,
        id: &str,
        input: ClientInput,
        sink: &mut dyn ActivitySink,
    ) -> CoreResult<Client> {
        let index = self
            .clients
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::ClientNotFound(id.to_string()))?;
        validate_client_name(&input.name)?;

        let before = self.clients[index].clone();
        let updated = apply_input(before.clone(), input);

        debug!(id = %updated.id, name = %updated.name, "Client updated");

        self.clients[index] = updated.clone();
        sink.record(ActivityEvent::new(
            ActivityAction::UpdateRetailClient,
            &updated.id,
            Some(&before),
            Some(&updated),
        ));
        Ok(updated)
    }

    /// Removes a client without checking for sales that reference it.
    pub fn delete(&mut self, id: &str, sink: &mut dyn ActivitySink) -> CoreResult<Client> {
        let index = self
            .clients
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::ClientNotFound(id.to_string()))?;
        let removed = self.clients.remove(index);

        debug!(id = %removed.id, "Client deleted");

        sink.record(ActivityEvent::new(
            ActivityAction::DeleteRetailClient,
            &removed.id,
            Some(&removed),
            None,
        ));
        Ok(removed)
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

fn apply_input(client: Client, input: ClientInput) -> Client {
    Client {
        name: input.name.trim().to_string(),
        national_id: input.national_id.trim().to_string(),
        email: input.email.trim().to_string(),
        phone: input.phone.trim().to_string(),
        province: input.province.trim().to_string(),
        city: input.city.trim().to_string(),
        postal_code: input.postal_code.trim().to_string(),
        address: input.address.trim().to_string(),
        ..client
    }
}
