use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared_types::{DealInput, DealStage, DealsResponse, MoveDealRequest};

use super::{ApiError, ApiResult, StoreData};
use crate::helpers::validation;
use crate::services::deals as service;

#[derive(Deserialize)]
pub struct DealListQuery {
    stage: Option<DealStage>,
}

pub async fn list_deals(store: StoreData, query: web::Query<DealListQuery>) -> ApiResult {
    let deals = match query.stage {
        Some(stage) => service::deals_by_stage(store.get_ref(), stage).await?,
        None => service::list_deals(store.get_ref()).await?,
    };
    Ok(HttpResponse::Ok().json(DealsResponse { deals }))
}

pub async fn get_deal(store: StoreData, path: web::Path<String>) -> ApiResult {
    let deal = service::get_deal(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(deal))
}

pub async fn create_deal(store: StoreData, request: web::Json<DealInput>) -> ApiResult {
    let input = request.into_inner();
    validation::validate_deal(&input).map_err(ApiError::validation)?;

    let deal = service::create_deal(store.get_ref(), input).await?;
    Ok(HttpResponse::Created().json(deal))
}

pub async fn update_deal(
    store: StoreData,
    path: web::Path<String>,
    request: web::Json<DealInput>,
) -> ApiResult {
    let input = request.into_inner();
    validation::validate_deal(&input).map_err(ApiError::validation)?;

    let deal = service::update_deal(store.get_ref(), &path, input).await?;
    Ok(HttpResponse::Ok().json(deal))
}

pub async fn move_deal(
    store: StoreData,
    path: web::Path<String>,
    request: web::Json<MoveDealRequest>,
) -> ApiResult {
    let deal = service::move_deal(store.get_ref(), &path, request.stage).await?;
    Ok(HttpResponse::Ok().json(deal))
}

pub async fn delete_deal(store: StoreData, path: web::Path<String>) -> ApiResult {
    service::delete_deal(store.get_ref(), &path).await?;
    Ok(HttpResponse::NoContent().finish())
}
