//! Collaborator ports consumed by the authorization core.
//!
//! Storage, relationship lookups and credential checks live behind these traits
//! so the policy layer stays free of persistence concerns.

use async_trait::async_trait;
use thiserror::Error;

use bazaar_core::{OrderId, OrderItemId, UserId};

use crate::{Identity, UserRecord};

/// A collaborator lookup failed (I/O, timeout, corrupt data, ...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{collaborator} failed: {detail}")]
pub struct CollaboratorError {
    pub collaborator: &'static str,
    pub detail: String,
}

impl CollaboratorError {
    pub fn new(collaborator: &'static str, detail: impl Into<String>) -> Self {
        Self {
            collaborator,
            detail: detail.into(),
        }
    }
}

/// Account lookup.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch an account by id. `Ok(None)` means the account does not exist.
    ///
    /// Implementations must leave `password_hash` empty unless
    /// `include_credentials` is set.
    async fn get_user_record(
        &self,
        id: UserId,
        include_credentials: bool,
    ) -> Result<Option<UserRecord>, CollaboratorError>;
}

/// Answers whether an account participates in an order, as consumer, supplier
/// or transporter.
#[async_trait]
pub trait RelationshipOracle: Send + Sync {
    async fn check_order_relationship(
        &self,
        identity: &Identity,
        order_id: OrderId,
    ) -> Result<bool, CollaboratorError>;

    async fn check_order_item_relationship(
        &self,
        identity: &Identity,
        order_id: OrderId,
        item_id: OrderItemId,
    ) -> Result<bool, CollaboratorError>;
}
