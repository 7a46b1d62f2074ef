//! Domain operations over a [`CrmStore`].
//!
//! Services assign ids and timestamps, keep contact references consistent
//! (cascade deletes, rejecting links to unknown contacts) and compute the
//! derived views. Required-field validation happens before a request gets
//! here.

pub mod contacts;
pub mod dashboard;
pub mod deals;
pub mod interactions;
pub mod pipeline;
pub mod seed;
pub mod tasks;

use crate::storage::CrmStore;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Contact {0} does not exist")]
    UnknownContact(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Fails with `UnknownContact` unless `contact_id` names an existing contact
pub(crate) async fn ensure_contact(store: &dyn CrmStore, contact_id: &str) -> ServiceResult<()> {
    match store.get_contact(contact_id).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::UnknownContact(contact_id.to_string())),
    }
}
