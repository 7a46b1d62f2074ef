use actix_web::HttpResponse;
use shared_types::PipelineResponse;

use super::{ApiResult, StoreData};
use crate::services::pipeline as service;

pub async fn get_pipeline(store: StoreData) -> ApiResult {
    let columns = service::pipeline(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(PipelineResponse { columns }))
}
