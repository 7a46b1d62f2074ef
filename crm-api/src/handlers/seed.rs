use actix_web::HttpResponse;

use super::{ApiResult, StoreData};
use crate::services::seed;

pub async fn seed_sample_data(store: StoreData) -> ApiResult {
    let summary = seed::create_sample_data(store.get_ref()).await?;
    Ok(HttpResponse::Created().json(summary))
}
