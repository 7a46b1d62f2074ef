use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Contact, TaskWithContact};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub total_contacts: usize,
    pub pending_tasks: usize,
    pub active_deals: usize,
    /// Sum of value over deals that are neither won nor lost
    pub active_value: f64,
    pub won_value: f64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub today_tasks: Vec<TaskWithContact>,
    pub recent_contacts: Vec<Contact>,
}

/// Counts of records created by the sample dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeedSummary {
    pub contacts: usize,
    pub interactions: usize,
    pub tasks: usize,
    pub deals: usize,
}
