// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 credential signing and verification.
//!
//! ## Verification order
//!
//! 1. Empty input is rejected as missing before any parsing.
//! 2. Structure: three segments with a decodable header and claims.
//! 3. Signature, against the process signing key.
//! 4. Expiry: a credential is valid up to and including its `exp` second.
//! 5. Subject and kind claims.
//!
//! No leeway is applied to `exp`; issuer and verifier share one clock.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::claims::{Claims, TokenKind, UncheckedClaims, UserId};
use crate::config::AuthConfig;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Errors produced while issuing or verifying a credential.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("credential is missing")]
    Missing,
    #[error("credential is malformed")]
    Malformed,
    #[error("credential signature is invalid")]
    InvalidSignature,
    #[error("credential has expired")]
    Expired,
    #[error("credential `{0}` claim is missing or has the wrong type")]
    ClaimMissing(&'static str),
    #[error("failed to sign credential: {0}")]
    Signing(String),
}

/// A signed credential together with the facts it asserts.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Credential {
    /// Compact JWS string handed to the client
    pub token: String,
    #[schema(value_type = u64)]
    pub subject_id: UserId,
    pub kind: TokenKind,
    /// Unix seconds
    pub issued_at: i64,
    /// Unix seconds
    pub expires_at: i64,
}

impl Credential {
    /// Remaining lifetime in seconds, measured from issuance.
    pub fn lifetime_secs(&self) -> i64 {
        self.expires_at - self.issued_at
    }
}

/// Signs and verifies credentials with the process-wide HMAC key.
///
/// Built once at startup from [`AuthConfig`] and shared read-only.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: AuthConfig,
}

impl TokenCodec {
    /// Create a codec for the configured secret.
    ///
    /// # Errors
    /// Returns `TokenError::Signing` when the secret is empty.
    pub fn new(config: AuthConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::Signing("signing key is empty".to_string()));
        }

        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        })
    }

    /// Lifetime of a credential of the given kind, in seconds.
    pub fn lifetime_secs(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.config.access_ttl.num_seconds(),
            TokenKind::Refresh => self.config.refresh_ttl.num_seconds(),
        }
    }

    /// Issue a credential for `subject` valid from now.
    pub fn issue(&self, subject: UserId, kind: TokenKind) -> Result<Credential, TokenError> {
        self.issue_at(subject, kind, Utc::now().timestamp())
    }

    /// Issue a credential as if the current time were `now` (Unix seconds).
    pub fn issue_at(
        &self,
        subject: UserId,
        kind: TokenKind,
        now: i64,
    ) -> Result<Credential, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.lifetime_secs(kind),
            kind,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(Credential {
            token,
            subject_id: subject,
            kind,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    /// Verify a raw credential and return its subject and kind.
    pub fn verify(&self, raw: &str) -> Result<(UserId, TokenKind), TokenError> {
        self.verify_at(raw, Utc::now().timestamp())
    }

    /// Verify a raw credential as if the current time were `now`.
    pub fn verify_at(&self, raw: &str, now: i64) -> Result<(UserId, TokenKind), TokenError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TokenError::Missing);
        }
        if raw.split('.').count() != 3 {
            return Err(TokenError::Malformed);
        }

        // Header and claims must parse on their own before the signature
        // is looked at; any failure after this point is the signature's.
        let unchecked = jsonwebtoken::dangerous::insecure_decode::<UncheckedClaims>(raw)
            .map_err(|_| TokenError::Malformed)?
            .claims;

        decode::<serde_json::Value>(raw, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::InvalidSignature)?;

        let exp = unchecked.exp.ok_or(TokenError::Malformed)?;
        if now > exp {
            return Err(TokenError::Expired);
        }

        let subject = unchecked.subject().ok_or(TokenError::ClaimMissing("sub"))?;
        let kind = unchecked.kind().ok_or(TokenError::ClaimMissing("kind"))?;

        Ok((subject, kind))
    }
}
