// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::auth::{password, AuthError, CredentialIssuer, TokenCodec};
use crate::config::SeedAdmin;
use crate::models::User;
use crate::store::{InMemoryStore, NewUser, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub codec: Arc<TokenCodec>,
    pub issuer: CredentialIssuer,
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppState {
    pub fn new(store: InMemoryStore, codec: TokenCodec) -> Self {
        let codec = Arc::new(codec);
        Self {
            store: Arc::new(RwLock::new(store)),
            issuer: CredentialIssuer::new(codec.clone()),
            codec,
        }
    }

    /// Make sure the bootstrap admin exists and carries the admin flag.
    ///
    /// An existing account with the same email is promoted; its password is
    /// left as is.
    pub async fn seed_admin(&self, seed: &SeedAdmin) -> Result<User, SeedError> {
        let mut store = self.store.write().await;
        let user = match store.user_by_email(&seed.email) {
            Some(existing) => existing,
            None => {
                let username = seed
                    .email
                    .split('@')
                    .next()
                    .unwrap_or_default()
                    .chars()
                    .filter(char::is_ascii_alphanumeric)
                    .collect::<String>();
                store.create_user(NewUser {
                    username: if username.len() >= 3 { username } else { "admin".to_string() },
                    email: seed.email.clone(),
                    password_hash: password::hash_password(&seed.password)?,
                    name: "Administrator".to_string(),
                })?
            }
        };
        Ok(store.set_admin(user.id, true)?)
    }
}
