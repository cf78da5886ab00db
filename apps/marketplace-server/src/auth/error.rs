// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! The variants keep the precise failure for logging, but every credential
//! failure renders the same 401 body so callers cannot probe which check
//! rejected them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use super::codec::TokenError;

/// Authentication error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential, or only a bare scheme
    #[error("authorization credential is missing")]
    MissingCredential,
    /// Credential could not be parsed as a signed token
    #[error("authorization credential is malformed")]
    MalformedCredential,
    /// Signature does not match the signing key
    #[error("credential signature is invalid")]
    InvalidSignature,
    /// Credential is past its expiry
    #[error("credential has expired")]
    ExpiredCredential,
    /// Subject or kind claim absent or of the wrong type
    #[error("credential `{0}` claim is missing or has the wrong type")]
    MissingClaim(&'static str),
    /// A refresh credential presented where an access one is required
    #[error("credential kind is not accepted for this request")]
    WrongCredentialKind,
    /// Subject does not resolve to a stored user
    #[error("credential subject does not resolve to a user")]
    UnknownSubject,
    /// Refresh exchange failed
    #[error("refresh token is invalid")]
    InvalidRefreshToken,
    /// Valid identity without the right to proceed
    #[error("insufficient permissions for this operation")]
    Forbidden,
    /// Storage could not answer a lookup
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    /// Signing or other internal failure
    #[error("internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
    error_code: &'static str,
}

impl AuthError {
    /// Whether this error means "no valid identity".
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredential
                | AuthError::MalformedCredential
                | AuthError::InvalidSignature
                | AuthError::ExpiredCredential
                | AuthError::MissingClaim(_)
                | AuthError::WrongCredentialKind
                | AuthError::UnknownSubject
        )
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            e if e.is_unauthenticated() => "unauthenticated",
            AuthError::InvalidRefreshToken => "invalid_refresh_token",
            AuthError::Forbidden => "forbidden",
            _ => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            e if e.is_unauthenticated() => StatusCode::UNAUTHORIZED,
            AuthError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            e if e.is_unauthenticated() => "Authentication required",
            AuthError::InvalidRefreshToken => "Invalid refresh token",
            AuthError::Forbidden => "Insufficient permissions for this operation",
            _ => "Internal server error",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Missing => AuthError::MissingCredential,
            TokenError::Malformed => AuthError::MalformedCredential,
            TokenError::InvalidSignature => AuthError::InvalidSignature,
            TokenError::Expired => AuthError::ExpiredCredential,
            TokenError::ClaimMissing(claim) => AuthError::MissingClaim(claim),
            TokenError::Signing(msg) => AuthError::Internal(msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::StorageUnavailable(_) | AuthError::Internal(_) => {
                tracing::error!(error = %self, "authorization failed internally");
            }
            AuthError::Forbidden => tracing::debug!("request denied by guard"),
            _ => tracing::debug!(reason = %self, "request not authenticated"),
        }

        let body = Json(AuthErrorBody {
            error: self.public_message(),
            error_code: self.error_code(),
        });
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: AuthError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn credential_failures_are_indistinguishable() {
        let variants = [
            AuthError::MissingCredential,
            AuthError::MalformedCredential,
            AuthError::InvalidSignature,
            AuthError::ExpiredCredential,
            AuthError::MissingClaim("sub"),
            AuthError::WrongCredentialKind,
            AuthError::UnknownSubject,
        ];

        let (_, expected) = body_of(AuthError::MissingCredential).await;
        for variant in variants {
            let (status, body) = body_of(variant).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, expected);
        }
        assert_eq!(expected["error_code"], "unauthenticated");
    }

    #[tokio::test]
    async fn forbidden_returns_403() {
        let (status, body) = body_of(AuthError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error_code"], "forbidden");
    }

    #[tokio::test]
    async fn storage_failure_hides_detail() {
        let (status, body) =
            body_of(AuthError::StorageUnavailable("db pool exhausted".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("pool"));
    }

    #[test]
    fn token_errors_map_one_to_one() {
        assert_eq!(AuthError::from(TokenError::Missing), AuthError::MissingCredential);
        assert_eq!(AuthError::from(TokenError::Expired), AuthError::ExpiredCredential);
        assert_eq!(
            AuthError::from(TokenError::ClaimMissing("sub")),
            AuthError::MissingClaim("sub")
        );
        assert!(matches!(
            AuthError::from(TokenError::Signing("x".into())),
            AuthError::Internal(_)
        ));
    }
}
