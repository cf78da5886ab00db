// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Turns a raw `Authorization` value into a [`RequestContext`].

use chrono::Utc;

use super::claims::{RequestContext, TokenKind};
use super::codec::TokenCodec;
use super::lookup::{LookupError, ResourceLookup};
use super::AuthError;

const BEARER: &str = "bearer";

/// Remove an optional `Bearer` scheme (case-insensitive).
///
/// A value without a recognized scheme is returned trimmed, so a bare token
/// is accepted as well.
pub fn strip_scheme(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER) => rest.trim(),
        _ if raw.eq_ignore_ascii_case(BEARER) => "",
        _ => raw,
    }
}

/// Authenticate a raw header value against the current clock.
pub fn authenticate(
    raw: &str,
    codec: &TokenCodec,
    lookup: &dyn ResourceLookup,
) -> Result<RequestContext, AuthError> {
    authenticate_at(raw, codec, lookup, Utc::now().timestamp())
}

/// Authenticate a raw header value as if the time were `now`.
pub fn authenticate_at(
    raw: &str,
    codec: &TokenCodec,
    lookup: &dyn ResourceLookup,
    now: i64,
) -> Result<RequestContext, AuthError> {
    let token = strip_scheme(raw);
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    let (subject, kind) = codec.verify_at(token, now)?;
    if kind != TokenKind::Access {
        return Err(AuthError::WrongCredentialKind);
    }

    let identity = lookup.find_user_by_id(subject).map_err(|e| match e {
        LookupError::NotFound { .. } => AuthError::UnknownSubject,
        LookupError::Unavailable(msg) => AuthError::StorageUnavailable(msg),
    })?;

    Ok(RequestContext::new(identity.id, identity.is_admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::codec::tests::{sign_raw, test_codec};
    use crate::auth::lookup::fakes::{FakeLookup, UnavailableLookup};
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[test]
    fn strip_scheme_variants() {
        assert_eq!(strip_scheme("Bearer abc"), "abc");
        assert_eq!(strip_scheme("bearer   abc "), "abc");
        assert_eq!(strip_scheme("BEARER abc"), "abc");
        assert_eq!(strip_scheme("abc"), "abc");
        assert_eq!(strip_scheme("Bearer "), "");
        assert_eq!(strip_scheme("Bearer"), "");
        assert_eq!(strip_scheme("   "), "");
    }

    #[test]
    fn empty_and_bare_scheme_are_missing() {
        let codec = test_codec();
        let lookup = FakeLookup::default().with_user(42, false);
        for raw in ["", "Bearer ", "Bearer", "  "] {
            assert_eq!(
                authenticate_at(raw, &codec, &lookup, NOW).unwrap_err(),
                AuthError::MissingCredential,
                "raw = {raw:?}"
            );
        }
    }

    #[test]
    fn valid_access_token_yields_context() {
        let codec = test_codec();
        let lookup = FakeLookup::default().with_user(42, true);
        let token = codec.issue_at(42, TokenKind::Access, NOW).unwrap().token;

        let ctx = authenticate_at(&bearer(&token), &codec, &lookup, NOW).unwrap();
        assert_eq!(ctx, RequestContext::new(42, true));

        // No scheme prefix at all
        let ctx = authenticate_at(&token, &codec, &lookup, NOW).unwrap();
        assert_eq!(ctx.identity_id, 42);
    }

    #[test]
    fn admin_flag_comes_from_storage() {
        let codec = test_codec();
        let token = codec.issue_at(42, TokenKind::Access, NOW).unwrap().token;

        let lookup = FakeLookup::default().with_user(42, false);
        assert!(!authenticate_at(&token, &codec, &lookup, NOW).unwrap().is_admin);

        let lookup = FakeLookup::default().with_user(42, true);
        assert!(authenticate_at(&token, &codec, &lookup, NOW).unwrap().is_admin);
    }

    #[test]
    fn refresh_token_is_not_a_bearer_credential() {
        let codec = test_codec();
        let lookup = FakeLookup::default().with_user(42, false);
        let token = codec.issue_at(42, TokenKind::Refresh, NOW).unwrap().token;
        assert_eq!(
            authenticate_at(&bearer(&token), &codec, &lookup, NOW).unwrap_err(),
            AuthError::WrongCredentialKind
        );
    }

    #[test]
    fn codec_failures_propagate() {
        let codec = test_codec();
        let lookup = FakeLookup::default().with_user(42, false);
        let token = codec.issue_at(42, TokenKind::Access, NOW).unwrap();

        assert_eq!(
            authenticate_at(&bearer(&token.token), &codec, &lookup, token.expires_at + 1)
                .unwrap_err(),
            AuthError::ExpiredCredential
        );
        assert_eq!(
            authenticate_at("Bearer junk", &codec, &lookup, NOW).unwrap_err(),
            AuthError::MalformedCredential
        );

        let no_sub = sign_raw(json!({"exp": NOW + 60, "kind": "access"}));
        assert_eq!(
            authenticate_at(&bearer(&no_sub), &codec, &lookup, NOW).unwrap_err(),
            AuthError::MissingClaim("sub")
        );
    }

    #[test]
    fn unknown_subject_is_rejected() {
        let codec = test_codec();
        let lookup = FakeLookup::default();
        let token = codec.issue_at(7, TokenKind::Access, NOW).unwrap().token;
        assert_eq!(
            authenticate_at(&token, &codec, &lookup, NOW).unwrap_err(),
            AuthError::UnknownSubject
        );
    }

    #[test]
    fn storage_outage_is_not_an_allow() {
        let codec = test_codec();
        let token = codec.issue_at(7, TokenKind::Access, NOW).unwrap().token;
        assert!(matches!(
            authenticate_at(&token, &codec, &UnavailableLookup, NOW),
            Err(AuthError::StorageUnavailable(_))
        ));
    }
}
