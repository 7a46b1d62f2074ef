use actix_web::HttpResponse;

use super::{ApiResult, StoreData};
use crate::services::dashboard as service;

pub async fn get_dashboard(store: StoreData) -> ApiResult {
    let dashboard = service::dashboard(store.get_ref(), service::RECENT_CONTACTS).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

pub async fn get_stats(store: StoreData) -> ApiResult {
    let stats = service::dashboard_stats(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
