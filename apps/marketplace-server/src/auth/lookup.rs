// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storage seam used by authentication and the ownership guards.
//!
//! Only the fields the checks need cross this boundary: the admin flag of a
//! user and the owner id of a product or order.

use thiserror::Error;

use super::claims::UserId;

/// Identity fields resolved from a verified subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityRecord {
    pub id: UserId,
    pub is_admin: bool,
}

/// Owner of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductOwner {
    pub seller_id: UserId,
}

/// Owner of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderOwner {
    pub buyer_id: UserId,
}

/// Lookup failures. The two outcomes are never merged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: u64 },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the records authorization decisions depend on.
pub trait ResourceLookup: Send + Sync {
    fn find_user_by_id(&self, id: UserId) -> Result<IdentityRecord, LookupError>;

    fn find_product_by_id(&self, id: u64) -> Result<ProductOwner, LookupError>;

    fn find_order_by_id(&self, id: u64) -> Result<OrderOwner, LookupError>;
}
