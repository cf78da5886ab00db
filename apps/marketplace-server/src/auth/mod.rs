// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! HS256 bearer authentication and per-resource authorization for the
//! marketplace API.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with email and password and receives an access token
//!    (24h) and a refresh token (7d)
//! 2. Client sends `Authorization: Bearer <access token>`
//! 3. Server:
//!    - Verifies signature and expiry with the process signing key
//!    - Extracts `sub` → canonical user id
//!    - Loads the user record to resolve the admin flag
//!    - Attaches a [`RequestContext`] to the request
//! 4. Route guards (admin, self-profile, seller, customer) run against the
//!    context before the handler
//!
//! ## Security
//!
//! - All non-health, non-auth endpoints require authentication
//! - Every credential failure renders the same 401 body
//! - Refresh tokens are only accepted by the refresh endpoint
//! - Guards fail closed; lookup failures never allow

pub mod authenticator;
pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod guards;
pub mod issuer;
pub mod lookup;
pub mod middleware;
pub mod password;

pub use claims::{Claims, RequestContext, TokenKind, UserId};
pub use codec::{Credential, TokenCodec, TokenError};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth};
pub use guards::{require, Guard, GuardChain, PathParams};
pub use issuer::{CredentialIssuer, TokenPair};
pub use lookup::{IdentityRecord, LookupError, OrderOwner, ProductOwner, ResourceLookup};
