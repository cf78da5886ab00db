// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Guards
//!
//! Guards run after authentication and decide whether the identity in the
//! [`RequestContext`] may reach the handler.
//!
//! | Guard | Allows when |
//! |-------|-------------|
//! | `AdminOnly` | the identity is an admin |
//! | `SelfProfile` | path `user_id` is the identity |
//! | `SellerOfProduct` | stored product `product_id` was listed by the identity |
//! | `CustomerOfOrder` | stored order `order_id` was placed by the identity |
//!
//! Every guard fails closed: a missing path parameter, a record that does
//! not exist, or a mismatching owner all deny. A storage outage is an
//! internal error, never an allow.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let route = require(&state, &[Guard::SellerOfProduct], put(update_product));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path, Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};

use super::claims::RequestContext;
use super::lookup::{LookupError, ResourceLookup};
use super::AuthError;
use crate::state::AppState;

pub const USER_ID_PARAM: &str = "user_id";
pub const PRODUCT_ID_PARAM: &str = "product_id";
pub const ORDER_ID_PARAM: &str = "order_id";

/// Path parameters of the matched route, by name.
#[derive(Debug, Clone, Default)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self(params)
    }

    /// Numeric id parameter. `None` when absent or not a `u64`.
    pub fn id(&self, name: &str) -> Option<u64> {
        self.0.get(name).and_then(|v| v.parse().ok())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A single authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    AdminOnly,
    SelfProfile,
    SellerOfProduct,
    CustomerOfOrder,
}

impl Guard {
    /// Decide whether `ctx` may proceed.
    pub fn check(
        &self,
        ctx: &RequestContext,
        params: &PathParams,
        lookup: &dyn ResourceLookup,
    ) -> Result<(), AuthError> {
        let allowed = match self {
            Guard::AdminOnly => ctx.is_admin,
            Guard::SelfProfile => {
                let user_id = required_param(params, USER_ID_PARAM)?;
                ctx.is_user(user_id)
            }
            Guard::SellerOfProduct => {
                let product_id = required_param(params, PRODUCT_ID_PARAM)?;
                let product = lookup.find_product_by_id(product_id).map_err(deny)?;
                ctx.is_user(product.seller_id)
            }
            Guard::CustomerOfOrder => {
                let order_id = required_param(params, ORDER_ID_PARAM)?;
                let order = lookup.find_order_by_id(order_id).map_err(deny)?;
                ctx.is_user(order.buyer_id)
            }
        };

        if allowed {
            Ok(())
        } else {
            tracing::debug!(guard = ?self, user_id = ctx.identity_id, "guard denied request");
            Err(AuthError::Forbidden)
        }
    }
}

fn required_param(params: &PathParams, name: &'static str) -> Result<u64, AuthError> {
    params.id(name).ok_or_else(|| {
        tracing::debug!(param = name, "guard parameter missing or not numeric");
        AuthError::Forbidden
    })
}

fn deny(e: LookupError) -> AuthError {
    match e {
        LookupError::NotFound { resource, id } => {
            tracing::debug!(resource, id, "guarded resource not found");
            AuthError::Forbidden
        }
        LookupError::Unavailable(msg) => {
            tracing::warn!(error = %msg, "storage unavailable during guard lookup");
            AuthError::StorageUnavailable(msg)
        }
    }
}

/// Ordered guards attached to one route.
#[derive(Clone)]
pub struct GuardChain {
    state: AppState,
    guards: Arc<[Guard]>,
}

impl GuardChain {
    pub fn new(state: AppState, guards: &[Guard]) -> Self {
        Self {
            state,
            guards: guards.into(),
        }
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    /// Run every guard in order, stopping at the first denial.
    pub fn check(
        guards: &[Guard],
        ctx: &RequestContext,
        params: &PathParams,
        lookup: &dyn ResourceLookup,
    ) -> Result<(), AuthError> {
        guards
            .iter()
            .try_for_each(|guard| guard.check(ctx, params, lookup))
    }
}

/// Wrap a method router so `guards` run before its handler.
///
/// The route must also sit behind the authentication middleware; without a
/// [`RequestContext`] the request is rejected as unauthenticated.
pub fn require(
    state: &AppState,
    guards: &[Guard],
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        GuardChain::new(state.clone(), guards),
        enforce,
    ))
}

/// Guard middleware. Prefer [`require`] over layering this directly.
pub async fn enforce(State(chain): State<GuardChain>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let Some(ctx) = parts.extensions.get::<RequestContext>().copied() else {
        return AuthError::MissingCredential.into_response();
    };

    let params = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, &()).await {
        Ok(Path(params)) => PathParams::new(params),
        Err(_) => PathParams::default(),
    };

    let outcome = {
        let store = chain.state.store.read().await;
        GuardChain::check(chain.guards(), &ctx, &params, &*store)
    };
    if let Err(e) = outcome {
        return e.into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::lookup::fakes::{FakeLookup, UnavailableLookup};

    fn params(pairs: &[(&str, &str)]) -> PathParams {
        pairs.iter().copied().collect()
    }

    fn none() -> PathParams {
        PathParams::default()
    }

    #[test]
    fn admin_only_depends_only_on_flag() {
        let lookup = FakeLookup::default();
        for id in [0, 1, 42, u64::MAX] {
            assert_eq!(
                Guard::AdminOnly.check(&RequestContext::new(id, false), &none(), &lookup),
                Err(AuthError::Forbidden)
            );
            assert!(Guard::AdminOnly
                .check(&RequestContext::new(id, true), &none(), &lookup)
                .is_ok());
        }
    }

    #[test]
    fn admin_only_ignores_storage() {
        assert!(Guard::AdminOnly
            .check(&RequestContext::new(1, true), &none(), &UnavailableLookup)
            .is_ok());
    }

    #[test]
    fn self_profile_compares_path_id() {
        let lookup = FakeLookup::default();
        let ctx = RequestContext::new(7, false);
        assert!(Guard::SelfProfile
            .check(&ctx, &params(&[("user_id", "7")]), &lookup)
            .is_ok());
        assert_eq!(
            Guard::SelfProfile.check(&ctx, &params(&[("user_id", "8")]), &lookup),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn self_profile_does_not_exempt_admins() {
        let ctx = RequestContext::new(1, true);
        assert_eq!(
            Guard::SelfProfile.check(&ctx, &params(&[("user_id", "2")]), &FakeLookup::default()),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn missing_or_bad_param_denies() {
        let lookup = FakeLookup::default().with_product(5, 7).with_order(3, 7);
        let ctx = RequestContext::new(7, true);
        for guard in [Guard::SelfProfile, Guard::SellerOfProduct, Guard::CustomerOfOrder] {
            assert_eq!(guard.check(&ctx, &none(), &lookup), Err(AuthError::Forbidden));
        }
        assert_eq!(
            Guard::SellerOfProduct.check(&ctx, &params(&[("product_id", "five")]), &lookup),
            Err(AuthError::Forbidden)
        );
        assert_eq!(
            Guard::CustomerOfOrder.check(&ctx, &params(&[("order_id", "-3")]), &lookup),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn seller_of_product_matches_stored_seller() {
        let lookup = FakeLookup::default().with_product(5, 7);
        let p = params(&[("product_id", "5")]);
        assert!(Guard::SellerOfProduct
            .check(&RequestContext::new(7, false), &p, &lookup)
            .is_ok());
        assert_eq!(
            Guard::SellerOfProduct.check(&RequestContext::new(8, true), &p, &lookup),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn seller_of_missing_product_denies() {
        let lookup = FakeLookup::default().with_product(5, 7);
        assert_eq!(
            Guard::SellerOfProduct.check(
                &RequestContext::new(7, false),
                &params(&[("product_id", "6")]),
                &lookup
            ),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn customer_of_order_matches_stored_buyer() {
        let lookup = FakeLookup::default().with_order(3, 11);
        let p = params(&[("order_id", "3")]);
        assert!(Guard::CustomerOfOrder
            .check(&RequestContext::new(11, false), &p, &lookup)
            .is_ok());
        assert_eq!(
            Guard::CustomerOfOrder.check(&RequestContext::new(12, false), &p, &lookup),
            Err(AuthError::Forbidden)
        );
        assert_eq!(
            Guard::CustomerOfOrder.check(
                &RequestContext::new(11, false),
                &params(&[("order_id", "4")]),
                &lookup
            ),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn storage_outage_is_internal_not_allow() {
        let ctx = RequestContext::new(7, false);
        assert!(matches!(
            Guard::SellerOfProduct.check(&ctx, &params(&[("product_id", "5")]), &UnavailableLookup),
            Err(AuthError::StorageUnavailable(_))
        ));
        assert!(matches!(
            Guard::CustomerOfOrder.check(&ctx, &params(&[("order_id", "5")]), &UnavailableLookup),
            Err(AuthError::StorageUnavailable(_))
        ));
    }

    #[test]
    fn chain_short_circuits_on_first_denial() {
        let ctx = RequestContext::new(7, false);
        let p = params(&[("product_id", "5")]);

        // AdminOnly denies first, so the unavailable store is never consulted.
        assert_eq!(
            GuardChain::check(
                &[Guard::AdminOnly, Guard::SellerOfProduct],
                &ctx,
                &p,
                &UnavailableLookup
            ),
            Err(AuthError::Forbidden)
        );

        let lookup = FakeLookup::default().with_product(5, 7);
        assert!(GuardChain::check(&[], &ctx, &p, &lookup).is_ok());
        assert!(GuardChain::check(&[Guard::SellerOfProduct], &ctx, &p, &lookup).is_ok());
        assert_eq!(
            GuardChain::check(&[Guard::SellerOfProduct, Guard::AdminOnly], &ctx, &p, &lookup),
            Err(AuthError::Forbidden)
        );
    }
}
