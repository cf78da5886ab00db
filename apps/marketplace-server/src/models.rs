// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the records held by the store and the request and
//! response data structures used by the REST API. Types derive `Serialize`,
//! `Deserialize`, and `ToSchema` as needed for JSON handling and OpenAPI
//! documentation.
//!
//! ## Model Categories
//!
//! - **Users**: Accounts, with the admin and seller flags
//! - **Products**: Listings owned by a seller
//! - **Orders**: Purchases placed by a buyer against one product
//! - **Categories**: Admin-managed product groupings
//! - **Auth**: Register, login and refresh payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::UserId;

// =============================================================================
// User Models
// =============================================================================

/// A registered account.
///
/// The password hash stays inside the process: it is skipped on
/// serialization and absent from the schema.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct User {
    #[schema(value_type = u64)]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub image_url: Option<String>,
    pub is_seller: bool,
    pub delivery_address: Option<String>,
    pub mobile_number: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Self-service profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub is_seller: Option<bool>,
    pub delivery_address: Option<String>,
    pub mobile_number: Option<String>,
}

// =============================================================================
// Auth Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// 3 to 255 alphanumeric characters
    pub username: String,
    /// 6 to 255 characters
    pub email: String,
    /// 6 to 255 characters
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Successful refresh exchange.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// =============================================================================
// Product Models
// =============================================================================

/// A listing owned by the seller who created it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Unit price before discount
    pub price: f64,
    /// Percentage, 0 to 100
    pub discount: f64,
    pub is_promo_sale: bool,
    pub stock: u32,
    pub category_id: u64,
    #[schema(value_type = u64)]
    pub seller_id: UserId,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Price of one unit after the discount.
    pub fn unit_price(&self) -> f64 {
        self.price * (1.0 - self.discount / 100.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub is_promo_sale: bool,
    pub stock: u32,
    pub category_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub is_promo_sale: Option<bool>,
    pub stock: Option<u32>,
    pub category_id: Option<u64>,
}

// =============================================================================
// Order Models
// =============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

/// A purchase of one product by a buyer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Order {
    pub id: u64,
    pub product_id: u64,
    #[schema(value_type = u64)]
    pub buyer_id: UserId,
    /// Copied from the product at placement
    #[schema(value_type = u64)]
    pub seller_id: UserId,
    pub quantity: u32,
    /// Discounted unit price times quantity
    pub total_price: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub quantity: Option<u32>,
    pub status: Option<OrderStatus>,
}

// =============================================================================
// Category Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: 1,
            name: String::new(),
            email: "a@b.co".into(),
            username: "alice".into(),
            password_hash: "$argon2id$secret".into(),
            image_url: None,
            is_seller: false,
            delivery_address: None,
            mobile_number: None,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_string(&user()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn unit_price_applies_percentage_discount() {
        let now = Utc::now();
        let product = Product {
            id: 1,
            name: "eggs".into(),
            description: String::new(),
            price: 10.0,
            discount: 25.0,
            is_promo_sale: true,
            stock: 5,
            category_id: 1,
            seller_id: 2,
            rating: 0.0,
            created_at: now,
            updated_at: now,
        };
        assert!((product.unit_price() - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn order_status_uses_lowercase() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Shipped).unwrap(),
            serde_json::json!("shipped")
        );
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
