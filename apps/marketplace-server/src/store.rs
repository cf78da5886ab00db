// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process store for users, products, orders and categories.
//!
//! Shared behind a `tokio::sync::RwLock` in [`AppState`](crate::state::AppState).
//! Ids are assigned per table, sequentially from 1, and never reused.

use std::collections::BTreeMap;

use chrono::Utc;
use thiserror::Error;

use crate::auth::{IdentityRecord, LookupError, OrderOwner, ProductOwner, ResourceLookup, UserId};
use crate::models::{
    Category, CategoryRequest, CreateOrderRequest, CreateProductRequest, Order, OrderStatus,
    Product, UpdateOrderRequest, UpdateProductRequest, UpdateUserRequest, User,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: u64 },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Invalid(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

fn not_found(resource: &'static str, id: u64) -> StoreError {
    StoreError::NotFound { resource, id }
}

/// Fields needed to create an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy)]
struct Sequence(u64);

impl Default for Sequence {
    fn default() -> Self {
        Sequence(1)
    }
}

impl Sequence {
    fn next(&mut self) -> u64 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    users: BTreeMap<UserId, User>,
    products: BTreeMap<u64, Product>,
    orders: BTreeMap<u64, Order>,
    categories: BTreeMap<u64, Category>,
    user_ids: Sequence,
    product_ids: Sequence,
    order_ids: Sequence,
    category_ids: Sequence,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    pub fn create_user(&mut self, new: NewUser) -> StoreResult<User> {
        if self.user_by_email(&new.email).is_some() {
            return Err(StoreError::Conflict("Email is already registered".into()));
        }
        if self
            .users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&new.username))
        {
            return Err(StoreError::Conflict("Username is already taken".into()));
        }

        let now = Utc::now();
        let user = User {
            id: self.user_ids.next(),
            name: new.name,
            email: new.email,
            username: new.username,
            password_hash: new.password_hash,
            image_url: None,
            is_seller: false,
            delivery_address: None,
            mobile_number: None,
            is_admin: false,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn user(&self, id: UserId) -> StoreResult<User> {
        self.users.get(&id).cloned().ok_or(not_found("user", id))
    }

    /// Email comparison ignores ASCII case.
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    pub fn update_user(&mut self, id: UserId, request: UpdateUserRequest) -> StoreResult<User> {
        let user = self.users.get_mut(&id).ok_or(not_found("user", id))?;

        if let Some(name) = request.name {
            user.name = name;
        }
        if let Some(image_url) = request.image_url {
            user.image_url = Some(image_url);
        }
        if let Some(is_seller) = request.is_seller {
            user.is_seller = is_seller;
        }
        if let Some(address) = request.delivery_address {
            user.delivery_address = Some(address);
        }
        if let Some(mobile) = request.mobile_number {
            user.mobile_number = Some(mobile);
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    pub fn set_admin(&mut self, id: UserId, is_admin: bool) -> StoreResult<User> {
        let user = self.users.get_mut(&id).ok_or(not_found("user", id))?;
        user.is_admin = is_admin;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    pub fn delete_user(&mut self, id: UserId) -> StoreResult<()> {
        self.users.remove(&id).map(|_| ()).ok_or(not_found("user", id))
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    pub fn create_product(
        &mut self,
        seller_id: UserId,
        request: CreateProductRequest,
    ) -> StoreResult<Product> {
        validate_pricing(request.price, request.discount)?;
        self.require_category(request.category_id)?;

        let now = Utc::now();
        let product = Product {
            id: self.product_ids.next(),
            name: request.name,
            description: request.description,
            price: request.price,
            discount: request.discount,
            is_promo_sale: request.is_promo_sale,
            stock: request.stock,
            category_id: request.category_id,
            seller_id,
            rating: 0.0,
            created_at: now,
            updated_at: now,
        };
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn product(&self, id: u64) -> StoreResult<Product> {
        self.products
            .get(&id)
            .cloned()
            .ok_or(not_found("product", id))
    }

    pub fn list_products(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    pub fn update_product(&mut self, id: u64, request: UpdateProductRequest) -> StoreResult<Product> {
        if let Some(category_id) = request.category_id {
            self.require_category(category_id)?;
        }
        let product = self.products.get_mut(&id).ok_or(not_found("product", id))?;
        validate_pricing(
            request.price.unwrap_or(product.price),
            request.discount.unwrap_or(product.discount),
        )?;

        if let Some(name) = request.name {
            product.name = name;
        }
        if let Some(description) = request.description {
            product.description = description;
        }
        if let Some(price) = request.price {
            product.price = price;
        }
        if let Some(discount) = request.discount {
            product.discount = discount;
        }
        if let Some(promo) = request.is_promo_sale {
            product.is_promo_sale = promo;
        }
        if let Some(stock) = request.stock {
            product.stock = stock;
        }
        if let Some(category_id) = request.category_id {
            product.category_id = category_id;
        }
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    pub fn delete_product(&mut self, id: u64) -> StoreResult<()> {
        self.products
            .remove(&id)
            .map(|_| ())
            .ok_or(not_found("product", id))
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Place an order, reserving stock from the product.
    pub fn place_order(&mut self, buyer_id: UserId, request: CreateOrderRequest) -> StoreResult<Order> {
        if request.quantity == 0 {
            return Err(StoreError::Invalid("Quantity must be positive".into()));
        }
        let product = self
            .products
            .get_mut(&request.product_id)
            .ok_or(not_found("product", request.product_id))?;
        if request.quantity > product.stock {
            return Err(StoreError::Invalid(format!(
                "Only {} units in stock",
                product.stock
            )));
        }

        product.stock -= request.quantity;
        let now = Utc::now();
        let order = Order {
            id: self.order_ids.next(),
            product_id: product.id,
            buyer_id,
            seller_id: product.seller_id,
            quantity: request.quantity,
            total_price: product.unit_price() * f64::from(request.quantity),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    pub fn order(&self, id: u64) -> StoreResult<Order> {
        self.orders.get(&id).cloned().ok_or(not_found("order", id))
    }

    /// Change quantity and/or status.
    ///
    /// Quantity can only change while the order still holds stock; the
    /// difference is taken from or returned to the product and the total is
    /// recomputed at the current unit price. Cancelling returns the stock.
    /// A cancelled order is final, and an order that no longer holds stock
    /// cannot go back to a status that would.
    pub fn update_order(&mut self, id: u64, request: UpdateOrderRequest) -> StoreResult<Order> {
        let order = self.orders.get(&id).cloned().ok_or(not_found("order", id))?;
        if let Some(status) = request.status {
            check_transition(order.status, status)?;
        }
        let mut updated = order.clone();

        if let Some(quantity) = request.quantity {
            if quantity == 0 {
                return Err(StoreError::Invalid("Quantity must be positive".into()));
            }
            if !holds_stock(order.status) {
                return Err(StoreError::Invalid(
                    "Quantity can no longer be changed for this order".into(),
                ));
            }
            if quantity != order.quantity {
                let product = self
                    .products
                    .get_mut(&order.product_id)
                    .ok_or(not_found("product", order.product_id))?;
                let available = product.stock + order.quantity;
                if quantity > available {
                    return Err(StoreError::Invalid(format!(
                        "Only {available} units available"
                    )));
                }
                product.stock = available - quantity;
                updated.quantity = quantity;
                updated.total_price = product.unit_price() * f64::from(quantity);
            }
        }

        if let Some(status) = request.status {
            if holds_stock(order.status) && status == OrderStatus::Cancelled {
                self.release_stock(order.product_id, updated.quantity);
            }
            updated.status = status;
        }

        updated.updated_at = Utc::now();
        self.orders.insert(id, updated.clone());
        Ok(updated)
    }

    /// Remove an order. Stock it still holds goes back to the product.
    pub fn delete_order(&mut self, id: u64) -> StoreResult<()> {
        let order = self.orders.remove(&id).ok_or(not_found("order", id))?;
        if holds_stock(order.status) {
            self.release_stock(order.product_id, order.quantity);
        }
        Ok(())
    }

    fn release_stock(&mut self, product_id: u64, quantity: u32) {
        if let Some(product) = self.products.get_mut(&product_id) {
            product.stock = product.stock.saturating_add(quantity);
        }
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    pub fn create_category(&mut self, request: CategoryRequest) -> StoreResult<Category> {
        self.ensure_category_name_free(&request.name, None)?;
        let category = Category {
            id: self.category_ids.next(),
            name: request.name,
            description: request.description,
        };
        self.categories.insert(category.id, category.clone());
        Ok(category)
    }

    pub fn list_categories(&self) -> Vec<Category> {
        self.categories.values().cloned().collect()
    }

    pub fn update_category(&mut self, id: u64, request: CategoryRequest) -> StoreResult<Category> {
        self.require_category(id)?;
        self.ensure_category_name_free(&request.name, Some(id))?;
        let category = self
            .categories
            .get_mut(&id)
            .ok_or(not_found("category", id))?;
        category.name = request.name;
        category.description = request.description;
        Ok(category.clone())
    }

    /// Categories still referenced by a product cannot be removed.
    pub fn delete_category(&mut self, id: u64) -> StoreResult<()> {
        self.require_category(id)?;
        if self.products.values().any(|p| p.category_id == id) {
            return Err(StoreError::Conflict(
                "Category is still used by products".into(),
            ));
        }
        self.categories.remove(&id);
        Ok(())
    }

    fn require_category(&self, id: u64) -> StoreResult<()> {
        if self.categories.contains_key(&id) {
            Ok(())
        } else {
            Err(not_found("category", id))
        }
    }

    fn ensure_category_name_free(&self, name: &str, except: Option<u64>) -> StoreResult<()> {
        if name.trim().is_empty() {
            return Err(StoreError::Invalid("Category name must not be empty".into()));
        }
        let taken = self
            .categories
            .values()
            .any(|c| Some(c.id) != except && c.name.eq_ignore_ascii_case(name));
        if taken {
            Err(StoreError::Conflict(format!("Category {name:?} already exists")))
        } else {
            Ok(())
        }
    }
}

fn holds_stock(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Pending | OrderStatus::Confirmed)
}

fn check_transition(from: OrderStatus, to: OrderStatus) -> StoreResult<()> {
    if from == to {
        return Ok(());
    }
    if from == OrderStatus::Cancelled || (!holds_stock(from) && holds_stock(to)) {
        return Err(StoreError::Invalid(format!(
            "Order cannot move from {} to {}",
            status_name(from),
            status_name(to)
        )));
    }
    Ok(())
}

fn status_name(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Confirmed => "confirmed",
        OrderStatus::Shipped => "shipped",
        OrderStatus::Delivered => "delivered",
        OrderStatus::Cancelled => "cancelled",
    }
}

fn validate_pricing(price: f64, discount: f64) -> StoreResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(StoreError::Invalid("Price must be a non-negative number".into()));
    }
    if !(0.0..=100.0).contains(&discount) {
        return Err(StoreError::Invalid("Discount must be between 0 and 100".into()));
    }
    Ok(())
}

impl ResourceLookup for InMemoryStore {
    fn find_user_by_id(&self, id: UserId) -> Result<IdentityRecord, LookupError> {
        self.users
            .get(&id)
            .map(|u| IdentityRecord {
                id: u.id,
                is_admin: u.is_admin,
            })
            .ok_or(LookupError::NotFound { resource: "user", id })
    }

    fn find_product_by_id(&self, id: u64) -> Result<ProductOwner, LookupError> {
        self.products
            .get(&id)
            .map(|p| ProductOwner {
                seller_id: p.seller_id,
            })
            .ok_or(LookupError::NotFound { resource: "product", id })
    }

    fn find_order_by_id(&self, id: u64) -> Result<OrderOwner, LookupError> {
        self.orders
            .get(&id)
            .map(|o| OrderOwner { buyer_id: o.buyer_id })
            .ok_or(LookupError::NotFound { resource: "order", id })
    }
}
