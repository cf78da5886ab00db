// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Argon2 password hashing (PHC string format).

use std::sync::OnceLock;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;

use super::AuthError;

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("failed to hash password: {e}")))
}

/// Check `password` against a stored PHC hash. An unparsable hash never
/// verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is unparsable");
            false
        }
    }
}

/// Hash checked when no account matches, so a login for an unknown email
/// costs the same Argon2 work as a wrong password.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("no-such-account").ok())
        .as_deref()
}

/// Verify a login attempt against the account's hash, if any. Without an
/// account the dummy hash is checked and the attempt always fails.
pub fn verify_login(password: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            if let Some(hash) = dummy_hash() {
                verify_password(password, hash);
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("pw1234").unwrap(), hash_password("pw1234").unwrap());
    }

    #[test]
    fn login_without_account_runs_argon2_and_fails() {
        assert!(dummy_hash().is_some_and(|hash| hash.starts_with("$argon2id$")));
        assert!(!verify_login("no-such-account", None));
        assert!(!verify_login("pw1234", None));
    }

    #[test]
    fn login_with_account_checks_its_hash() {
        let hash = hash_password("pw1234").unwrap();
        assert!(verify_login("pw1234", Some(&hash)));
        assert!(!verify_login("pw12345", Some(&hash)));
    }

    #[test]
    fn plaintext_stored_value_never_verifies() {
        assert!(!verify_password("pw1234", "pw1234"));
    }
}
