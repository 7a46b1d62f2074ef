use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared_types::{ContactInput, ContactOptionsResponse, ContactsResponse};

use super::{ApiError, ApiResult, StoreData};
use crate::helpers::validation;
use crate::services::contacts as service;
use crate::services::dashboard::RECENT_CONTACTS;

pub async fn list_contacts(store: StoreData) -> ApiResult {
    let contacts = service::list_contacts(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ContactsResponse { contacts }))
}

pub async fn get_contact(store: StoreData, path: web::Path<String>) -> ApiResult {
    let contact = service::get_contact(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(contact))
}

pub async fn create_contact(store: StoreData, request: web::Json<ContactInput>) -> ApiResult {
    let input = request.into_inner();
    validation::validate_contact(&input).map_err(ApiError::validation)?;

    let contact = service::create_contact(store.get_ref(), input).await?;
    Ok(HttpResponse::Created().json(contact))
}

pub async fn update_contact(
    store: StoreData,
    path: web::Path<String>,
    request: web::Json<ContactInput>,
) -> ApiResult {
    let input = request.into_inner();
    validation::validate_contact(&input).map_err(ApiError::validation)?;

    let contact = service::update_contact(store.get_ref(), &path, input).await?;
    Ok(HttpResponse::Ok().json(contact))
}

pub async fn delete_contact(store: StoreData, path: web::Path<String>) -> ApiResult {
    let removed = service::delete_contact(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "deleted": path.into_inner(),
        "interactions_removed": removed.interactions,
        "tasks_removed": removed.tasks,
    })))
}

#[derive(Deserialize)]
pub struct RecentQuery {
    limit: Option<usize>,
}

pub async fn recent_contacts(store: StoreData, query: web::Query<RecentQuery>) -> ApiResult {
    let limit = query.limit.unwrap_or(RECENT_CONTACTS);
    let contacts = service::recent_contacts(store.get_ref(), limit).await?;
    Ok(HttpResponse::Ok().json(ContactsResponse { contacts }))
}

pub async fn contact_options(store: StoreData) -> ApiResult {
    let options = service::contact_options(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ContactOptionsResponse { options }))
}

pub async fn contact_overview(store: StoreData, path: web::Path<String>) -> ApiResult {
    let overview = service::contact_overview(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(overview))
}
