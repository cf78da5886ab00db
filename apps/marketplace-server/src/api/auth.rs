// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login and refresh. These routes are unauthenticated.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::password,
    error::ApiError,
    models::{
        LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest, User,
    },
    state::AppState,
    store::NewUser,
};

const TOKEN_TYPE: &str = "Bearer";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn validate_registration(request: &RegisterRequest) -> Result<(), ApiError> {
    let username_len = request.username.chars().count();
    if !(3..=255).contains(&username_len)
        || !request.username.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ApiError::bad_request(
            "Username must be 3 to 255 alphanumeric characters",
        ));
    }

    let email_len = request.email.chars().count();
    let well_formed = match request.email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !(6..=255).contains(&email_len) || !well_formed {
        return Err(ApiError::bad_request("Email must be a valid address"));
    }

    let password_len = request.password.chars().count();
    if !(6..=255).contains(&password_len) {
        return Err(ApiError::bad_request(
            "Password must be 6 to 255 characters",
        ));
    }

    Ok(())
}

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, body = User),
        (status = 400, description = "Invalid username, email or password"),
        (status = 409, description = "Email or username already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    validate_registration(&request)?;
    let password_hash = password::hash_password(&request.password)?;

    let mut store = state.store.write().await;
    let user = store.create_user(NewUser {
        username: request.username,
        email: request.email,
        password_hash,
        name: request.name.unwrap_or_default(),
    })?;

    tracing::info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state.store.read().await.user_by_email(&request.email);
    let verified = password::verify_login(
        &request.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    );

    let Some(user) = user.filter(|_| verified) else {
        tracing::debug!("login rejected");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let pair = state.issuer.issue_token_pair(user.id)?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(LoginResponse {
        expires_in: pair.access.lifetime_secs(),
        access_token: pair.access.token,
        refresh_token: pair.refresh.token,
        token_type: TOKEN_TYPE.to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    request_body = RefreshRequest,
    tag = "Auth",
    responses(
        (status = 200, body = RefreshResponse),
        (status = 401, description = "Refresh token invalid, expired or not a refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let access = state.issuer.refresh(&request.refresh_token)?;

    Ok(Json(RefreshResponse {
        expires_in: access.lifetime_secs(),
        access_token: access.token,
        token_type: TOKEN_TYPE.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenKind;
    use crate::state::tests::{empty_state, state_with_users, TEST_PASSWORD, TEST_USER};

    fn registration(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            name: None,
        }
    }

    #[test]
    fn registration_rules() {
        assert!(validate_registration(&registration("bob", "bob@x.io", "secret")).is_ok());
        assert!(validate_registration(&registration("bo", "bob@x.io", "secret")).is_err());
        assert!(validate_registration(&registration("bob_1", "bob@x.io", "secret")).is_err());
        assert!(validate_registration(&registration("bob", "bobx.io", "secret")).is_err());
        assert!(validate_registration(&registration("bob", "@x.io", "secret")).is_err());
        assert!(validate_registration(&registration("bob", "b@x", "secret")).is_err());
        assert!(validate_registration(&registration("bob", "bob@x.io", "short")).is_err());
        assert!(validate_registration(&registration(&"a".repeat(256), "bob@x.io", "secret")).is_err());
    }

    #[tokio::test]
    async fn register_hashes_password_and_rejects_duplicates() {
        let state = empty_state();
        let (status, Json(user)) = register(
            State(state.clone()),
            Json(registration("bob", "bob@x.io", "secret1")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user.id, 1);
        assert!(!user.is_admin);
        assert!(password::verify_password("secret1", &user.password_hash));

        let err = register(
            State(state),
            Json(registration("robert", "bob@x.io", "secret1")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn login_returns_token_pair() {
        let state = state_with_users().await;
        let Json(response) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "alice@example.com".into(),
                password: TEST_PASSWORD.into(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 24 * 3600);
        assert_eq!(
            state.codec.verify(&response.access_token).unwrap(),
            (TEST_USER, TokenKind::Access)
        );
        assert_eq!(
            state.codec.verify(&response.refresh_token).unwrap(),
            (TEST_USER, TokenKind::Refresh)
        );
    }

    #[tokio::test]
    async fn login_failures_look_the_same() {
        let state = state_with_users().await;
        let wrong_password = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "alice@example.com".into(),
                password: "nope-nope".into(),
            }),
        )
        .await
        .unwrap_err();
        let unknown_email = login(
            State(state),
            Json(LoginRequest {
                email: "nobody@example.com".into(),
                password: TEST_PASSWORD.into(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.status, unknown_email.status);
        assert_eq!(wrong_password.message, unknown_email.message);
    }

    #[tokio::test]
    async fn refresh_exchanges_only_refresh_tokens() {
        let state = state_with_users().await;
        let pair = state.issuer.issue_token_pair(TEST_USER).unwrap();

        let Json(response) = refresh(
            State(state.clone()),
            Json(RefreshRequest {
                refresh_token: pair.refresh.token,
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            state.codec.verify(&response.access_token).unwrap(),
            (TEST_USER, TokenKind::Access)
        );

        let err = refresh(
            State(state),
            Json(RefreshRequest {
                refresh_token: pair.access.token,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_code, Some("invalid_refresh_token"));
    }
}
