// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::Request,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{middleware::authenticate, require, Credential, Guard, RequestContext, TokenKind},
    models::{
        Category, CategoryRequest, CreateOrderRequest, CreateProductRequest, LoginRequest,
        LoginResponse, Order, OrderStatus, Product, RefreshRequest, RefreshResponse,
        RegisterRequest, UpdateOrderRequest, UpdateProductRequest, UpdateUserRequest, User,
    },
    state::AppState,
};

pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh));

    let protected_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        // Admin check happens in the `AdminOnly` extractor.
        .route("/users", get(users::list_users))
        .route(
            "/users/{user_id}",
            require(
                &state,
                &[Guard::SelfProfile],
                get(users::get_user).put(users::update_user),
            )
            .merge(require(&state, &[Guard::AdminOnly], delete(users::delete_user))),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{product_id}",
            get(products::get_product).merge(require(
                &state,
                &[Guard::SellerOfProduct],
                put(products::update_product).delete(products::delete_product),
            )),
        )
        .route("/orders", post(orders::create_order))
        .route(
            "/orders/{order_id}",
            require(
                &state,
                &[Guard::CustomerOfOrder],
                get(orders::get_order)
                    .put(orders::update_order)
                    .delete(orders::delete_order),
            ),
        )
        .route(
            "/categories",
            get(categories::list_categories).merge(require(
                &state,
                &[Guard::AdminOnly],
                post(categories::create_category),
            )),
        )
        .route(
            "/categories/{category_id}",
            require(
                &state,
                &[Guard::AdminOnly],
                put(categories::update_category).delete(categories::delete_category),
            ),
        )
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/v1", public_routes.merge(protected_routes))
        .with_state(state);

    app.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive()),
        )
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        auth::register,
        auth::login,
        auth::refresh,
        users::get_current_user,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        orders::create_order,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category
    ),
    components(
        schemas(
            User,
            UpdateUserRequest,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            RefreshResponse,
            Product,
            CreateProductRequest,
            UpdateProductRequest,
            Order,
            OrderStatus,
            CreateOrderRequest,
            UpdateOrderRequest,
            Category,
            CategoryRequest,
            Credential,
            TokenKind,
            RequestContext,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and health probes"),
        (name = "Auth", description = "Registration, login and token refresh"),
        (name = "Users", description = "Profiles and account administration"),
        (name = "Products", description = "Product listings"),
        (name = "Orders", description = "Order placement and management"),
        (name = "Categories", description = "Product categories")
    )
)]
pub struct ApiDoc;
