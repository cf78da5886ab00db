// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access and refresh credential issuance.
//!
//! The issuer is stateless: every call depends only on the codec's key and
//! configured lifetimes.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use super::claims::{TokenKind, UserId};
use super::codec::{Credential, TokenCodec};
use super::AuthError;

/// Credentials returned together on login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPair {
    pub access: Credential,
    pub refresh: Credential,
}

#[derive(Clone)]
pub struct CredentialIssuer {
    codec: Arc<TokenCodec>,
}

impl CredentialIssuer {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    pub fn issue_access_token(&self, user_id: UserId) -> Result<Credential, AuthError> {
        Ok(self.codec.issue(user_id, TokenKind::Access)?)
    }

    pub fn issue_refresh_token(&self, user_id: UserId) -> Result<Credential, AuthError> {
        Ok(self.codec.issue(user_id, TokenKind::Refresh)?)
    }

    pub fn issue_token_pair(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.issue_access_token(user_id)?,
            refresh: self.issue_refresh_token(user_id)?,
        })
    }

    /// Exchange a refresh credential for a new access credential.
    pub fn refresh(&self, refresh_token: &str) -> Result<Credential, AuthError> {
        self.refresh_at(refresh_token, Utc::now().timestamp())
    }

    /// Same as [`refresh`](Self::refresh) with an explicit clock.
    pub fn refresh_at(&self, refresh_token: &str, now: i64) -> Result<Credential, AuthError> {
        let (subject, kind) = self
            .codec
            .verify_at(refresh_token, now)
            .map_err(|e| {
                tracing::debug!(reason = %e, "refresh credential rejected");
                AuthError::InvalidRefreshToken
            })?;

        if kind != TokenKind::Refresh {
            tracing::debug!(user_id = subject, kind = %kind, "non-refresh credential presented for refresh");
            return Err(AuthError::InvalidRefreshToken);
        }

        self.codec
            .issue_at(subject, TokenKind::Access, now)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::codec::tests::test_codec;

    const NOW: i64 = 1_700_000_000;

    fn issuer() -> CredentialIssuer {
        CredentialIssuer::new(Arc::new(test_codec()))
    }

    #[test]
    fn lifetimes_are_24h_and_7d() {
        let issuer = issuer();
        let pair = issuer.issue_token_pair(9).unwrap();
        assert_eq!(pair.access.lifetime_secs(), 24 * 3600);
        assert_eq!(pair.refresh.lifetime_secs(), 168 * 3600);
        assert_eq!(pair.access.kind, TokenKind::Access);
        assert_eq!(pair.refresh.kind, TokenKind::Refresh);
        assert_eq!(pair.access.subject_id, 9);
    }

    #[test]
    fn refresh_issues_access_for_same_subject() {
        let issuer = issuer();
        let codec = test_codec();
        let refresh = codec.issue_at(42, TokenKind::Refresh, NOW).unwrap();

        let access = issuer.refresh_at(&refresh.token, NOW + 60).unwrap();
        assert_eq!(access.subject_id, 42);
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(access.issued_at, NOW + 60);
        assert_eq!(
            codec.verify_at(&access.token, NOW + 60).unwrap(),
            (42, TokenKind::Access)
        );
    }

    #[test]
    fn access_token_cannot_refresh() {
        let issuer = issuer();
        let access = test_codec().issue_at(42, TokenKind::Access, NOW).unwrap();
        assert_eq!(
            issuer.refresh_at(&access.token, NOW).unwrap_err(),
            AuthError::InvalidRefreshToken
        );
    }

    #[test]
    fn expired_or_garbage_refresh_is_rejected() {
        let issuer = issuer();
        let refresh = test_codec().issue_at(42, TokenKind::Refresh, NOW).unwrap();
        assert_eq!(
            issuer
                .refresh_at(&refresh.token, refresh.expires_at + 1)
                .unwrap_err(),
            AuthError::InvalidRefreshToken
        );
        assert_eq!(
            issuer.refresh_at("not-a-token", NOW).unwrap_err(),
            AuthError::InvalidRefreshToken
        );
        assert_eq!(
            issuer.refresh_at("", NOW).unwrap_err(),
            AuthError::InvalidRefreshToken
        );
    }
}
