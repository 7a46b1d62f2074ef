use serde::{Deserialize, Serialize};

pub mod contact;
pub mod dashboard;
pub mod deal;
pub mod interaction;
pub mod pipeline;
pub mod task;

pub use contact::{
    Contact, ContactInput, ContactOption, ContactOptionsResponse, ContactOverview,
    ContactsResponse,
};
pub use dashboard::{DashboardResponse, DashboardStats, SeedSummary};
pub use deal::{Deal, DealInput, DealStage, DealsResponse, MoveDealRequest, ParseStageError};
pub use interaction::{Interaction, InteractionInput, InteractionsResponse};
pub use pipeline::{PipelineColumn, PipelineDeal, PipelineResponse};
pub use task::{
    Task, TaskInput, TaskStatusFilter, TaskWithContact, TasksResponse, TodayTasksResponse,
};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
