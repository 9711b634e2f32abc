//! Per-(resource kind, method) authorization rules.

use core::str::FromStr;
use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::{ResourceKind, Role};

/// HTTP method as seen by the policy layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported method '{0}'")]
pub struct UnsupportedMethod(pub String);

impl FromStr for Method {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnsupportedMethod(s.to_string()))
    }
}

/// Authorization predicate attached to a (resource kind, method) pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Caller must be an administrator.
    AdminOnly,
    /// `userId` route param is the caller, or caller is an administrator.
    SelfOrAdmin,
    /// `userId` route param is the caller and the caller holds the role.
    SelfAndRole(Role),
    /// `userId` is the caller and `addressId` is one of the caller's
    /// addresses, or caller is an administrator.
    OwnedAddress,
    /// Caller is linked to the `orderId` order.
    OrderRelationship,
    /// Caller is linked to the `orderId` order, then to `itemId` within it.
    OrderItemRelationship,
    /// Any resolved identity; visibility filtering happens downstream.
    Authenticated,
    /// Account creation: `type == ADMINISTRATOR` requires an administrator
    /// caller, anything else is open self-registration.
    PrivilegedSignup,
    /// Account update: self-or-admin, but a body carrying `type` (a role
    /// change) requires an administrator.
    UserUpdate,
}

impl Rule {
    /// Whether the rule can only pass with a resolved caller.
    pub fn requires_identity(&self) -> bool {
        !matches!(self, Rule::PrivilegedSignup)
    }

    /// Whether the predicate reads the request body.
    pub fn inspects_body(&self) -> bool {
        matches!(self, Rule::PrivilegedSignup | Rule::UserUpdate)
    }
}

/// Immutable dispatch table. Pairs without an entry fail closed.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: HashMap<(ResourceKind, Method), Rule>,
}

impl RuleTable {
    pub fn standard() -> Self {
        use Method::{Delete, Get, Post, Put};
        use ResourceKind as K;

        let consumer = Rule::SelfAndRole(Role::Consumer);

        let entries = [
            (K::AllUsers, Get, Rule::AdminOnly),
            (K::AllUsers, Post, Rule::PrivilegedSignup),
            (K::SingleUser, Get, Rule::SelfOrAdmin),
            (K::SingleUser, Put, Rule::UserUpdate),
            (K::SingleUser, Delete, Rule::SelfOrAdmin),
            (K::AllAddresses, Get, Rule::SelfOrAdmin),
            (K::AllAddresses, Post, Rule::SelfOrAdmin),
            (K::SingleAddress, Get, Rule::OwnedAddress),
            (K::SingleAddress, Put, Rule::OwnedAddress),
            (K::SingleAddress, Delete, Rule::OwnedAddress),
            (K::AllNotifications, Get, Rule::SelfOrAdmin),
            (K::AllNotifications, Post, Rule::AdminOnly),
            (K::SingleNotification, Get, Rule::SelfOrAdmin),
            (K::SingleNotification, Put, Rule::SelfOrAdmin),
            (K::SingleNotification, Delete, Rule::SelfOrAdmin),
            (K::AllUserOrders, Get, Rule::SelfOrAdmin),
            (K::AllOrders, Get, Rule::Authenticated),
            (K::AllOrders, Post, Rule::Authenticated),
            (K::SingleOrder, Get, Rule::OrderRelationship),
            (K::SingleOrder, Put, Rule::OrderRelationship),
            (K::SingleOrder, Delete, Rule::AdminOnly),
            (K::SingleOrderItem, Get, Rule::OrderItemRelationship),
            (K::SingleOrderItem, Put, Rule::OrderItemRelationship),
            (K::AllCategories, Post, Rule::AdminOnly),
            (K::SingleCategory, Put, Rule::AdminOnly),
            (K::SingleCategory, Delete, Rule::AdminOnly),
            (K::AllCartItems, Get, consumer),
            (K::AllCartItems, Post, consumer),
            (K::AllCartItems, Delete, consumer),
            (K::SingleCartItem, Put, consumer),
            (K::SingleCartItem, Delete, consumer),
            (K::AllWishlistItems, Get, consumer),
            (K::AllWishlistItems, Post, consumer),
            (K::AllWishlistItems, Delete, consumer),
            (K::SingleWishlistItem, Delete, consumer),
        ];

        Self::from_entries(entries)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (ResourceKind, Method, Rule)>) -> Self {
        let rules = entries
            .into_iter()
            // Nothing may ever be granted on an unclassified route.
            .filter(|(kind, _, _)| *kind != ResourceKind::Unclassified)
            .map(|(kind, method, rule)| ((kind, method), rule))
            .collect();
        Self { rules }
    }

    pub fn get(&self, kind: ResourceKind, method: Method) -> Option<Rule> {
        self.rules.get(&(kind, method)).copied()
    }

    pub fn methods_for(&self, kind: ResourceKind) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|m| self.rules.contains_key(&(kind, *m)))
            .collect()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}
