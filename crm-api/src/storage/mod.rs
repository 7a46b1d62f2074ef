pub mod json_file;
pub mod migrations;
pub mod sqlite;

pub use json_file::JsonFileStore;
pub use sqlite::SqliteStore;

use anyhow::Result;
use async_trait::async_trait;
use shared_types::{Contact, Deal, Interaction, Task};
use std::sync::Arc;

pub type SharedStore = Arc<dyn CrmStore>;

/// What a contact delete removed along with the contact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactDeletion {
    pub interactions: usize,
    pub tasks: usize,
}

/// Persistence for the four CRM collections.
///
/// Implementations store whole records; ids and timestamps are assigned by the
/// service layer before a record reaches the store. `update_*` and `delete_*`
/// return `false` and leave the collection untouched when the id is unknown.
/// `list_*` returns records in insertion order.
///
/// Interactions and tasks must point at an existing contact when stored.
/// `delete_contact_cascade` removes a contact with its interactions and tasks
/// as one unit and returns `None` when the contact is unknown. Deals keep
/// their reference, or lose it where the backend nulls it.
#[async_trait]
pub trait CrmStore: Send + Sync {
    async fn ping(&self) -> Result<()>;

    async fn list_contacts(&self) -> Result<Vec<Contact>>;
    async fn get_contact(&self, id: &str) -> Result<Option<Contact>>;
    async fn insert_contact(&self, contact: &Contact) -> Result<()>;
    async fn update_contact(&self, contact: &Contact) -> Result<bool>;
    async fn delete_contact_cascade(&self, id: &str) -> Result<Option<ContactDeletion>>;

    async fn list_interactions(&self) -> Result<Vec<Interaction>>;
    async fn get_interaction(&self, id: &str) -> Result<Option<Interaction>>;
    async fn insert_interaction(&self, interaction: &Interaction) -> Result<()>;
    async fn update_interaction(&self, interaction: &Interaction) -> Result<bool>;
    async fn delete_interaction(&self, id: &str) -> Result<bool>;

    async fn list_tasks(&self) -> Result<Vec<Task>>;
    async fn get_task(&self, id: &str) -> Result<Option<Task>>;
    async fn insert_task(&self, task: &Task) -> Result<()>;
    async fn update_task(&self, task: &Task) -> Result<bool>;
    async fn delete_task(&self, id: &str) -> Result<bool>;

    async fn list_deals(&self) -> Result<Vec<Deal>>;
    async fn get_deal(&self, id: &str) -> Result<Option<Deal>>;
    async fn insert_deal(&self, deal: &Deal) -> Result<()>;
    async fn update_deal(&self, deal: &Deal) -> Result<bool>;
    async fn delete_deal(&self, id: &str) -> Result<bool>;
}
