use actix_web::{web, HttpResponse};
use shared_types::{InteractionInput, InteractionsResponse};

use super::{ApiError, ApiResult, StoreData};
use crate::helpers::validation;
use crate::services::interactions as service;

pub async fn list_interactions(store: StoreData) -> ApiResult {
    let interactions = service::list_interactions(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(InteractionsResponse { interactions }))
}

pub async fn list_contact_interactions(store: StoreData, path: web::Path<String>) -> ApiResult {
    let interactions = service::interactions_by_contact(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(InteractionsResponse { interactions }))
}

pub async fn get_interaction(store: StoreData, path: web::Path<String>) -> ApiResult {
    let interaction = service::get_interaction(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(interaction))
}

pub async fn create_interaction(
    store: StoreData,
    request: web::Json<InteractionInput>,
) -> ApiResult {
    let input = request.into_inner();
    validation::validate_interaction(&input).map_err(ApiError::validation)?;

    let interaction = service::create_interaction(store.get_ref(), input).await?;
    Ok(HttpResponse::Created().json(interaction))
}

pub async fn update_interaction(
    store: StoreData,
    path: web::Path<String>,
    request: web::Json<InteractionInput>,
) -> ApiResult {
    let input = request.into_inner();
    validation::validate_interaction(&input).map_err(ApiError::validation)?;

    let interaction = service::update_interaction(store.get_ref(), &path, input).await?;
    Ok(HttpResponse::Ok().json(interaction))
}

pub async fn delete_interaction(store: StoreData, path: web::Path<String>) -> ApiResult {
    service::delete_interaction(store.get_ref(), &path).await?;
    Ok(HttpResponse::NoContent().finish())
}
