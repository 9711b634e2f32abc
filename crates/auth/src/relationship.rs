use std::sync::Arc;

use bazaar_core::{OrderId, OrderItemId};

use crate::{CollaboratorError, Identity, RelationshipOracle};

/// Adapter over the relationship oracle used by order-scoped rules.
#[derive(Clone)]
pub struct RelationshipChecker {
    oracle: Arc<dyn RelationshipOracle>,
}

impl RelationshipChecker {
    pub fn new(oracle: Arc<dyn RelationshipOracle>) -> Self {
        Self { oracle }
    }

    /// Is `identity` a consumer, supplier or transporter of `order_id`?
    pub async fn order(&self, identity: &Identity, order_id: OrderId) -> Result<bool, CollaboratorError> {
        let linked = self.oracle.check_order_relationship(identity, order_id).await?;
        tracing::debug!(user_id = %identity.id, %order_id, linked, "order relationship checked");
        Ok(linked)
    }

    /// Is `identity` linked to `item_id` within `order_id`?
    ///
    /// Callers must only ask this after [`Self::order`] returned `true`.
    pub async fn order_item(
        &self,
        identity: &Identity,
        order_id: OrderId,
        item_id: OrderItemId,
    ) -> Result<bool, CollaboratorError> {
        let linked = self
            .oracle
            .check_order_item_relationship(identity, order_id, item_id)
            .await?;
        tracing::debug!(user_id = %identity.id, %order_id, %item_id, linked, "order item relationship checked");
        Ok(linked)
    }
}
