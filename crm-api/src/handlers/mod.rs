pub mod contacts;
pub mod dashboard;
pub mod deals;
pub mod interactions;
pub mod pipeline;
pub mod seed;
pub mod tasks;

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::ErrorResponse;

use crate::services::ServiceError;
use crate::storage::CrmStore;

/// Store handle shared with every handler
pub type StoreData = web::Data<dyn CrmStore>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn validation(err: anyhow::Error) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => {
                tracing::warn!("{}", err);
                ApiError::NotFound(err.to_string())
            }
            ServiceError::UnknownContact(_) => ApiError::Validation(err.to_string()),
            ServiceError::Storage(e) => {
                tracing::error!("Storage failure: {:#}", e);
                ApiError::Internal
            }
        }
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

pub type ApiResult = Result<HttpResponse, ApiError>;

pub async fn health(store: StoreData) -> HttpResponse {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "storage": "connected"
        })),
        Err(e) => {
            tracing::error!("Health check failed: {:#}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "storage": "disconnected"
            }))
        }
    }
}

fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}

/// Registers every route. Fixed paths come before their `{id}` siblings.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/health", web::get().to(health))
        .route("/api/contacts", web::get().to(contacts::list_contacts))
        .route("/api/contacts", web::post().to(contacts::create_contact))
        .route("/api/contacts/options", web::get().to(contacts::contact_options))
        .route("/api/contacts/recent", web::get().to(contacts::recent_contacts))
        .route("/api/contacts/{id}", web::get().to(contacts::get_contact))
        .route("/api/contacts/{id}", web::put().to(contacts::update_contact))
        .route("/api/contacts/{id}", web::delete().to(contacts::delete_contact))
        .route("/api/contacts/{id}/overview", web::get().to(contacts::contact_overview))
        .route("/api/contacts/{id}/interactions", web::get().to(interactions::list_contact_interactions))
        .route("/api/contacts/{id}/tasks", web::get().to(tasks::list_contact_tasks))
        .route("/api/interactions", web::get().to(interactions::list_interactions))
        .route("/api/interactions", web::post().to(interactions::create_interaction))
        .route("/api/interactions/{id}", web::get().to(interactions::get_interaction))
        .route("/api/interactions/{id}", web::put().to(interactions::update_interaction))
        .route("/api/interactions/{id}", web::delete().to(interactions::delete_interaction))
        .route("/api/tasks", web::get().to(tasks::list_tasks))
        .route("/api/tasks", web::post().to(tasks::create_task))
        .route("/api/tasks/today", web::get().to(tasks::today_tasks))
        .route("/api/tasks/{id}", web::get().to(tasks::get_task))
        .route("/api/tasks/{id}", web::put().to(tasks::update_task))
        .route("/api/tasks/{id}", web::delete().to(tasks::delete_task))
        .route("/api/tasks/{id}/toggle", web::patch().to(tasks::toggle_task))
        .route("/api/deals", web::get().to(deals::list_deals))
        .route("/api/deals", web::post().to(deals::create_deal))
        .route("/api/deals/{id}", web::get().to(deals::get_deal))
        .route("/api/deals/{id}", web::put().to(deals::update_deal))
        .route("/api/deals/{id}", web::delete().to(deals::delete_deal))
        .route("/api/deals/{id}/stage", web::patch().to(deals::move_deal))
        .route("/api/pipeline", web::get().to(pipeline::get_pipeline))
        .route("/api/dashboard", web::get().to(dashboard::get_dashboard))
        .route("/api/dashboard/stats", web::get().to(dashboard::get_stats))
        .route("/api/seed", web::post().to(seed::seed_sample_data));
}
