// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Marketplace Server - Farmers Market REST Backend
//!
//! Users list products, place orders against them and browse admin-managed
//! categories. Every non-public route is authenticated with an HS256 bearer
//! token and then checked by per-resource authorization guards.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Token codec, issuer, authenticator and guards
//! - `config` - Environment configuration
//! - `store` - In-process storage
//! - `telemetry` - Tracing setup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
pub mod telemetry;
