//! Route template → resource kind classification.
//!
//! The table built by [`RouteTable::standard`] is the single source of truth for
//! which routes are protected: a template missing from it classifies as
//! [`ResourceKind::Unclassified`] and is always denied.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

/// Semantic class of a protected route, independent of its literal path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    AllUsers,
    SingleUser,
    AllAddresses,
    SingleAddress,
    AllNotifications,
    SingleNotification,
    AllUserOrders,
    AllOrders,
    SingleOrder,
    SingleOrderItem,
    AllCategories,
    SingleCategory,
    AllCartItems,
    SingleCartItem,
    AllWishlistItems,
    SingleWishlistItem,
    Unclassified,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::AllUsers => "ALL_USERS",
            ResourceKind::SingleUser => "SINGLE_USER",
            ResourceKind::AllAddresses => "ALL_ADDRESSES",
            ResourceKind::SingleAddress => "SINGLE_ADDRESS",
            ResourceKind::AllNotifications => "ALL_NOTIFICATIONS",
            ResourceKind::SingleNotification => "SINGLE_NOTIFICATION",
            ResourceKind::AllUserOrders => "ALL_USER_ORDERS",
            ResourceKind::AllOrders => "ALL_ORDERS",
            ResourceKind::SingleOrder => "SINGLE_ORDER",
            ResourceKind::SingleOrderItem => "SINGLE_ORDER_ITEM",
            ResourceKind::AllCategories => "ALL_CATEGORIES",
            ResourceKind::SingleCategory => "SINGLE_CATEGORY",
            ResourceKind::AllCartItems => "ALL_CART_ITEMS",
            ResourceKind::SingleCartItem => "SINGLE_CART_ITEM",
            ResourceKind::AllWishlistItems => "ALL_WISHLIST_ITEMS",
            ResourceKind::SingleWishlistItem => "SINGLE_WISHLIST_ITEM",
            ResourceKind::Unclassified => "UNCLASSIFIED",
        }
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protected routes shipped with the service (axum `:param` syntax).
const STANDARD_ROUTES: &[(&str, ResourceKind)] = &[
    ("/user", ResourceKind::AllUsers),
    ("/user/:userId", ResourceKind::SingleUser),
    ("/user/:userId/addresses", ResourceKind::AllAddresses),
    ("/user/:userId/addresses/:addressId", ResourceKind::SingleAddress),
    ("/user/:userId/notifications", ResourceKind::AllNotifications),
    ("/user/:userId/notifications/:notificationId", ResourceKind::SingleNotification),
    ("/user/:userId/orders", ResourceKind::AllUserOrders),
    ("/user/:userId/cart", ResourceKind::AllCartItems),
    ("/user/:userId/cart/:itemId", ResourceKind::SingleCartItem),
    ("/user/:userId/wishlist", ResourceKind::AllWishlistItems),
    ("/user/:userId/wishlist/:itemId", ResourceKind::SingleWishlistItem),
    ("/orders", ResourceKind::AllOrders),
    ("/orders/:orderId", ResourceKind::SingleOrder),
    ("/orders/:orderId/items/:itemId", ResourceKind::SingleOrderItem),
    ("/store/categories", ResourceKind::AllCategories),
    ("/store/categories/:categoryId", ResourceKind::SingleCategory),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route template '{0}' is declared more than once")]
    DuplicateTemplate(String),

    #[error("route template '{0}' cannot be classified as UNCLASSIFIED")]
    ExplicitUnclassified(String),
}

/// Immutable route template → resource kind mapping.
#[derive(Debug, Clone)]
pub struct RouteTable {
    // Declaration order is kept so routers mount templates deterministically.
    entries: Vec<(String, ResourceKind)>,
    index: HashMap<String, ResourceKind>,
}

impl RouteTable {
    pub fn standard() -> Self {
        // The static table is covered by tests; a failure here is a build defect.
        Self::from_entries(STANDARD_ROUTES.iter().map(|(t, k)| (t.to_string(), *k)))
            .unwrap_or_else(|e| panic!("standard route table is invalid: {e}"))
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, ResourceKind)>,
    ) -> Result<Self, RouteTableError> {
        let mut ordered = Vec::new();
        let mut index = HashMap::new();

        for (template, kind) in entries {
            if kind == ResourceKind::Unclassified {
                return Err(RouteTableError::ExplicitUnclassified(template));
            }
            if index.insert(template.clone(), kind).is_some() {
                return Err(RouteTableError::DuplicateTemplate(template));
            }
            ordered.push((template, kind));
        }

        Ok(Self {
            entries: ordered,
            index,
        })
    }

    pub fn classify(&self, route_template: &str) -> ResourceKind {
        self.index
            .get(route_template)
            .copied()
            .unwrap_or(ResourceKind::Unclassified)
    }

    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, ResourceKind)> {
        self.entries.iter().map(|(t, k)| (t.as_str(), *k))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
