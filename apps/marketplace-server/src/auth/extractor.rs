// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated requests.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(ctx): Auth) -> impl IntoResponse {
//!     // ctx is RequestContext
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::guards::{Guard, PathParams};
use super::middleware::context_from_headers;
use super::{AuthError, RequestContext};
use crate::state::AppState;

/// Extractor for the authenticated caller.
///
/// Uses the context attached by the authentication middleware when present,
/// and otherwise authenticates from the `Authorization` header itself.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_orders(
///     Auth(ctx): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<Vec<Order>>, ApiError> {
///     // ctx.identity_id is the caller's user id
/// }
/// ```
pub struct Auth(pub RequestContext);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the context
        if let Some(ctx) = parts.extensions.get::<RequestContext>().copied() {
            return Ok(Auth(ctx));
        }

        let ctx = context_from_headers(&parts.headers, state).await?;
        parts.extensions.insert(ctx);
        Ok(Auth(ctx))
    }
}

/// Extractor that requires an admin caller.
pub struct AdminOnly(pub RequestContext);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(ctx) = Auth::from_request_parts(parts, state).await?;

        let store = state.store.read().await;
        Guard::AdminOnly.check(&ctx, &PathParams::default(), &*store)?;

        Ok(AdminOnly(ctx))
    }
}
