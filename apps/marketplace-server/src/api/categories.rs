// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    models::{Category, CategoryRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [Category]))
)]
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    let store = state.store.read().await;
    Json(store.list_categories())
}

#[utoipa::path(
    post,
    path = "/v1/categories",
    request_body = CategoryRequest,
    tag = "Categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = Category),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Name already in use")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let mut store = state.store.write().await;
    let category = store.create_category(request)?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/v1/categories/{category_id}",
    params(("category_id" = u64, Path, description = "Identifier of the category")),
    request_body = CategoryRequest,
    tag = "Categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Category),
        (status = 403, description = "Caller is not an admin"),
        (status = 404)
    )
)]
pub async fn update_category(
    Path(category_id): Path<u64>,
    State(state): State<AppState>,
    Json(request): Json<CategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let mut store = state.store.write().await;
    Ok(Json(store.update_category(category_id, request)?))
}

#[utoipa::path(
    delete,
    path = "/v1/categories/{category_id}",
    params(("category_id" = u64, Path, description = "Identifier of the category")),
    tag = "Categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 204),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Category still has products")
    )
)]
pub async fn delete_category(
    Path(category_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_category(category_id)?;
    Ok(StatusCode::NO_CONTENT)
}
