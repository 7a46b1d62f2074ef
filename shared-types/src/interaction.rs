use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Interaction {
    pub id: String,
    pub contact_id: String,
    /// Free text category such as "call", "email" or "meeting".
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDate,
    pub notes: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InteractionInput {
    pub contact_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InteractionsResponse {
    pub interactions: Vec<Interaction>,
}
