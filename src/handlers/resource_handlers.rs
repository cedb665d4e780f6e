//! CRUD handlers shared by every resource type.
//!
//! Each handler is generic over the resource; the router instantiates them
//! once per collection and axum pulls the matching `ResourceService<R>` out
//! of the state.

use crate::{
    errors::AppError,
    models::Resource,
    services::ResourceService,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

/// `POST /{resource}`
pub async fn create<R: Resource>(
    State(service): State<ResourceService<R>>,
    payload: Result<Json<R::Input>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), AppError> {
    let Json(input) = payload?;
    let record = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /{resource}`
pub async fn list<R: Resource>(
    State(service): State<ResourceService<R>>,
) -> Result<Json<Vec<R>>, AppError> {
    Ok(Json(service.list().await?))
}

/// `GET /{resource}/{id}`
pub async fn fetch<R: Resource>(
    State(service): State<ResourceService<R>>,
    Path(id): Path<String>,
) -> Result<Json<R>, AppError> {
    Ok(Json(service.get(&id).await?))
}

/// `PUT /{resource}/{id}` — full replace of the input fields.
pub async fn update<R: Resource>(
    State(service): State<ResourceService<R>>,
    Path(id): Path<String>,
    payload: Result<Json<R::Input>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    let Json(input) = payload?;
    Ok(Json(service.update(&id, input).await?))
}

/// `DELETE /{resource}/{id}`
pub async fn delete<R: Resource>(
    State(service): State<ResourceService<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
