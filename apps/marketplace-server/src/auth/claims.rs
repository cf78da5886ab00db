// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the per-request authenticated context.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a persisted user.
pub type UserId = u64;

/// Which lifetime class a credential belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived credential accepted on every protected request.
    Access,
    /// Long-lived credential only accepted by the refresh endpoint.
    Refresh,
}

impl TokenKind {
    /// Parse the `kind` claim value.
    pub fn from_claim(value: &str) -> Option<TokenKind> {
        match value {
            "access" => Some(TokenKind::Access),
            "refresh" => Some(TokenKind::Refresh),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims written into every credential we sign.
///
/// `sub` carries the user id as a decimal string and is the only subject
/// claim; verification reads the same name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Access or refresh
    pub kind: TokenKind,
    /// Unique token identifier
    pub jti: String,
}

/// Claims as they arrive, before any of them has been checked.
///
/// Every field is optional and loosely typed so that a structurally valid
/// token with a bad subject reports a missing claim instead of a parse error.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UncheckedClaims {
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub kind: Option<serde_json::Value>,
}

impl UncheckedClaims {
    pub fn subject(&self) -> Option<UserId> {
        self.sub
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse::<UserId>().ok())
    }

    pub fn kind(&self) -> Option<TokenKind> {
        self.kind
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(TokenKind::from_claim)
    }
}

/// Authenticated identity for one in-flight request.
///
/// Inserted into the request extensions by the authentication middleware and
/// read by the guards and the `Auth` extractor. Absent means unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RequestContext {
    /// Id of the user the credential resolved to
    #[schema(value_type = u64)]
    pub identity_id: UserId,
    /// Admin flag as stored on the user record at request time
    pub is_admin: bool,
}

impl RequestContext {
    pub fn new(identity_id: UserId, is_admin: bool) -> Self {
        Self {
            identity_id,
            is_admin,
        }
    }

    /// Check if the context belongs to the given user.
    pub fn is_user(&self, user_id: UserId) -> bool {
        self.identity_id == user_id
    }
}
