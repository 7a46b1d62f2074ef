use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared_types::{TaskInput, TaskStatusFilter, TasksResponse, TodayTasksResponse};

use super::{ApiError, ApiResult, StoreData};
use crate::helpers::validation;
use crate::services::tasks as service;

#[derive(Deserialize)]
pub struct TaskListQuery {
    #[serde(default)]
    status: TaskStatusFilter,
}

pub async fn list_tasks(store: StoreData, query: web::Query<TaskListQuery>) -> ApiResult {
    let tasks = service::list_tasks(store.get_ref(), query.status).await?;
    Ok(HttpResponse::Ok().json(TasksResponse { tasks }))
}

pub async fn list_contact_tasks(store: StoreData, path: web::Path<String>) -> ApiResult {
    let tasks = service::tasks_by_contact(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(TasksResponse { tasks }))
}

pub async fn today_tasks(store: StoreData) -> ApiResult {
    let due = service::tasks_due_today(store.get_ref()).await?;
    let tasks = service::with_contact_names(store.get_ref(), due).await?;
    Ok(HttpResponse::Ok().json(TodayTasksResponse { tasks }))
}

pub async fn get_task(store: StoreData, path: web::Path<String>) -> ApiResult {
    let task = service::get_task(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(task))
}

pub async fn create_task(store: StoreData, request: web::Json<TaskInput>) -> ApiResult {
    let input = request.into_inner();
    validation::validate_task(&input).map_err(ApiError::validation)?;

    let task = service::create_task(store.get_ref(), input).await?;
    Ok(HttpResponse::Created().json(task))
}

pub async fn update_task(
    store: StoreData,
    path: web::Path<String>,
    request: web::Json<TaskInput>,
) -> ApiResult {
    let input = request.into_inner();
    validation::validate_task(&input).map_err(ApiError::validation)?;

    let task = service::update_task(store.get_ref(), &path, input).await?;
    Ok(HttpResponse::Ok().json(task))
}

pub async fn toggle_task(store: StoreData, path: web::Path<String>) -> ApiResult {
    let task = service::toggle_task(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(task))
}

pub async fn delete_task(store: StoreData, path: web::Path<String>) -> ApiResult {
    service::delete_task(store.get_ref(), &path).await?;
    Ok(HttpResponse::NoContent().finish())
}
