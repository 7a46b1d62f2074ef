use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Sales pipeline stage. The declaration order is the order of the pipeline
/// board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DealStage {
    Lead,
    Qualification,
    Proposal,
    Negotiation,
    #[serde(rename = "Won/Client")]
    WonClient,
    Lost,
}

impl DealStage {
    pub const ALL: [DealStage; 6] = [
        DealStage::Lead,
        DealStage::Qualification,
        DealStage::Proposal,
        DealStage::Negotiation,
        DealStage::WonClient,
        DealStage::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Lead => "Lead",
            DealStage::Qualification => "Qualification",
            DealStage::Proposal => "Proposal",
            DealStage::Negotiation => "Negotiation",
            DealStage::WonClient => "Won/Client",
            DealStage::Lost => "Lost",
        }
    }

    /// Open deals are the ones still in play: neither won nor lost.
    pub fn is_active(&self) -> bool {
        !matches!(self, DealStage::WonClient | DealStage::Lost)
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown deal stage: {0}")]
pub struct ParseStageError(pub String);

impl FromStr for DealStage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DealStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ParseStageError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Deal {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub contact_id: Option<String>,
    pub stage: DealStage,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DealInput {
    pub name: String,
    #[serde(default)]
    pub value: f64,
    pub contact_id: Option<String>,
    pub stage: DealStage,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MoveDealRequest {
    pub stage: DealStage,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DealsResponse {
    pub deals: Vec<Deal>,
}
