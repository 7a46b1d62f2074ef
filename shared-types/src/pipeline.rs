use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Deal, DealStage};

/// Deal card on the pipeline board
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PipelineDeal {
    #[serde(flatten)]
    pub deal: Deal,
    pub contact_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PipelineColumn {
    pub stage: DealStage,
    pub deals: Vec<PipelineDeal>,
    pub count: usize,
    pub total_value: f64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PipelineResponse {
    pub columns: Vec<PipelineColumn>,
}
