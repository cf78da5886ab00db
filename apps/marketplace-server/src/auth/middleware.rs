// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Layered over every protected route. On success the resolved
//! [`RequestContext`] is inserted into the request extensions, where the
//! guards and the [`Auth`](super::Auth) extractor find it.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/v1/users/me", get(me))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), authenticate));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::authenticator::authenticate as authenticate_raw;
use super::{AuthError, RequestContext};
use crate::state::AppState;

/// Authentication middleware function.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let result = context_from_headers(request.headers(), &state).await;
    match result {
        Ok(ctx) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Resolve the caller from the `Authorization` header.
///
/// An absent header is treated as an empty one; a value that is not visible
/// ASCII is malformed.
pub async fn context_from_headers(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<RequestContext, AuthError> {
    let raw = match headers.get(AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| AuthError::MalformedCredential)?,
        None => "",
    };

    let store = state.store.read().await;
    authenticate_raw(raw, &state.codec, &*store)
}
