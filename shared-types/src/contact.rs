use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub plan: Option<String>,
    /// Day of month the customer is billed, 1-31.
    pub payment_day: Option<u8>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Body of both create and update requests. Updates replace the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub plan: Option<String>,
    pub payment_day: Option<u8>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
}

/// Entry of a contact picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactOption {
    pub value: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactOptionsResponse {
    pub options: Vec<ContactOption>,
}

/// Contact detail page: the contact with everything linked to it.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactOverview {
    pub contact: Contact,
    pub interactions: Vec<crate::Interaction>,
    pub tasks: Vec<crate::Task>,
    pub deals: Vec<crate::Deal>,
}
