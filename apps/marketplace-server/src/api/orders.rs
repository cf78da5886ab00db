// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order endpoints. Everything but placement is restricted to the buyer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreateOrderRequest, Order, UpdateOrderRequest},
    state::AppState,
};

/// Place an order for a product.
///
/// Seller and total price are taken from the stored product; the requested
/// quantity is reserved from its stock.
#[utoipa::path(
    post,
    path = "/v1/orders",
    request_body = CreateOrderRequest,
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = Order),
        (status = 400, description = "Quantity is zero or exceeds stock"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn create_order(
    Auth(ctx): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let mut store = state.store.write().await;
    let order = store.place_order(ctx.identity_id, request)?;
    tracing::info!(
        order_id = order.id,
        product_id = order.product_id,
        buyer_id = order.buyer_id,
        "order placed"
    );
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/v1/orders/{order_id}",
    params(("order_id" = u64, Path, description = "Order placed by the caller")),
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Order),
        (status = 403, description = "Caller is not the buyer")
    )
)]
pub async fn get_order(
    Path(order_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<Order>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.order(order_id)?))
}

#[utoipa::path(
    put,
    path = "/v1/orders/{order_id}",
    params(("order_id" = u64, Path, description = "Order placed by the caller")),
    request_body = UpdateOrderRequest,
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Order),
        (status = 400, description = "Quantity cannot be satisfied or changed"),
        (status = 403, description = "Caller is not the buyer")
    )
)]
pub async fn update_order(
    Path(order_id): Path<u64>,
    State(state): State<AppState>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    let mut store = state.store.write().await;
    Ok(Json(store.update_order(order_id, request)?))
}

#[utoipa::path(
    delete,
    path = "/v1/orders/{order_id}",
    params(("order_id" = u64, Path, description = "Order placed by the caller")),
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 204),
        (status = 403, description = "Caller is not the buyer")
    )
)]
pub async fn delete_order(
    Path(order_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_order(order_id)?;
    tracing::info!(order_id, "order deleted");
    Ok(StatusCode::NO_CONTENT)
}
