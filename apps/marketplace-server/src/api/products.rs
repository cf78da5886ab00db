// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreateProductRequest, Product, UpdateProductRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [Product]))
)]
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    let store = state.store.read().await;
    Json(store.list_products())
}

#[utoipa::path(
    get,
    path = "/v1/products/{product_id}",
    params(("product_id" = u64, Path, description = "Identifier of the product")),
    tag = "Products",
    security(("bearer_auth" = [])),
    responses((status = 200, body = Product), (status = 404))
)]
pub async fn get_product(
    Path(product_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<Product>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.product(product_id)?))
}

/// List a product. The caller becomes its seller.
#[utoipa::path(
    post,
    path = "/v1/products",
    request_body = CreateProductRequest,
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = Product),
        (status = 400, description = "Invalid price or discount"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_product(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::bad_request("Product name must not be empty"));
    }

    let mut store = state.store.write().await;
    let product = store.create_product(ctx.identity_id, request)?;
    tracing::info!(product_id = product.id, seller_id = ctx.identity_id, "product listed");
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/v1/products/{product_id}",
    params(("product_id" = u64, Path, description = "Product listed by the caller")),
    request_body = UpdateProductRequest,
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Product),
        (status = 403, description = "Caller is not the seller")
    )
)]
pub async fn update_product(
    Path(product_id): Path<u64>,
    State(state): State<AppState>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let mut store = state.store.write().await;
    Ok(Json(store.update_product(product_id, request)?))
}

#[utoipa::path(
    delete,
    path = "/v1/products/{product_id}",
    params(("product_id" = u64, Path, description = "Product listed by the caller")),
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 204),
        (status = 403, description = "Caller is not the seller")
    )
)]
pub async fn delete_product(
    Path(product_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_product(product_id)?;
    tracing::info!(product_id, "product removed");
    Ok(StatusCode::NO_CONTENT)
}
