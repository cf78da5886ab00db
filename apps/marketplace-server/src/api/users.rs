// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.
//!
//! Profile reads and updates are only open to the profile's owner; listing
//! and deleting accounts is admin-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{AdminOnly, Auth, UserId},
    error::ApiError,
    models::{UpdateUserRequest, User},
    state::AppState,
};

/// Get the current authenticated user's profile.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User information", body = User),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(
    Auth(ctx): Auth,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.user(ctx.identity_id)?))
}

#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [User]),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_users(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.list_users()))
}

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}",
    params(("user_id" = u64, Path, description = "Must be the caller's own id")),
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = User),
        (status = 403, description = "Not the caller's profile")
    )
)]
pub async fn get_user(
    Path(user_id): Path<UserId>,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.user(user_id)?))
}

#[utoipa::path(
    put,
    path = "/v1/users/{user_id}",
    params(("user_id" = u64, Path, description = "Must be the caller's own id")),
    request_body = UpdateUserRequest,
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = User),
        (status = 403, description = "Not the caller's profile")
    )
)]
pub async fn update_user(
    Path(user_id): Path<UserId>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let mut store = state.store.write().await;
    let user = store.update_user(user_id, request)?;
    tracing::info!(user_id, "profile updated");
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/v1/users/{user_id}",
    params(("user_id" = u64, Path, description = "Account to remove")),
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 204),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Path(user_id): Path<UserId>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_user(user_id)?;
    tracing::info!(user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RequestContext;
    use crate::state::tests::{state_with_users, TEST_USER};

    #[tokio::test]
    async fn current_user_comes_from_context() {
        let state = state_with_users().await;
        let Json(user) = get_current_user(Auth(RequestContext::new(TEST_USER, false)), State(state))
            .await
            .unwrap();
        assert_eq!(user.id, TEST_USER);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let state = state_with_users().await;
        let Json(user) = update_user(
            Path(TEST_USER),
            State(state.clone()),
            Json(UpdateUserRequest {
                is_seller: Some(true),
                mobile_number: Some("+256700000000".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert!(user.is_seller);
        assert_eq!(user.mobile_number.as_deref(), Some("+256700000000"));
        assert_eq!(user.email, "alice@example.com");
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let state = state_with_users().await;
        let err = delete_user(Path(99), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
