//! In-memory identity store and relationship oracle (dev/test).

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;

use bazaar_auth::{CollaboratorError, Identity, IdentityStore, RelationshipOracle, UserRecord};
use bazaar_core::{OrderId, OrderItemId, UserId};

const COLLABORATOR: &str = "in-memory directory";

/// Participation of an account in an order (as consumer, supplier or
/// transporter), optionally narrowed to specific line items.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderLink {
    pub user_id: UserId,
    pub order_id: OrderId,
    #[serde(default)]
    pub item_ids: Vec<OrderItemId>,
}

/// Seed file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub order_links: Vec<OrderLink>,
}

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<UserId, UserRecord>>,
    links: RwLock<HashMap<(UserId, OrderId), HashSet<OrderItemId>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Self {
        let directory = Self::new();
        for user in seed.users {
            directory.upsert_user(user);
        }
        for link in seed.order_links {
            directory.link_order(link.user_id, link.order_id, link.item_ids);
        }
        directory
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_seed(serde_json::from_str(json)?))
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing seed file {}", path.display()))
    }

    pub fn upsert_user(&self, record: UserRecord) {
        if let Ok(mut users) = self.users.write() {
            users.insert(record.id, record);
        }
    }

    pub fn link_order(
        &self,
        user_id: UserId,
        order_id: OrderId,
        item_ids: impl IntoIterator<Item = OrderItemId>,
    ) {
        if let Ok(mut links) = self.links.write() {
            links.entry((user_id, order_id)).or_default().extend(item_ids);
        }
    }
}

fn poisoned() -> CollaboratorError {
    CollaboratorError::new(COLLABORATOR, "lock poisoned")
}

#[async_trait]
impl IdentityStore for InMemoryDirectory {
    async fn get_user_record(
        &self,
        id: UserId,
        include_credentials: bool,
    ) -> Result<Option<UserRecord>, CollaboratorError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(&id).cloned().map(|record| {
            if include_credentials {
                record
            } else {
                record.without_credentials()
            }
        }))
    }
}

#[async_trait]
impl RelationshipOracle for InMemoryDirectory {
    async fn check_order_relationship(
        &self,
        identity: &Identity,
        order_id: OrderId,
    ) -> Result<bool, CollaboratorError> {
        let links = self.links.read().map_err(|_| poisoned())?;
        Ok(links.contains_key(&(identity.id, order_id)))
    }

    async fn check_order_item_relationship(
        &self,
        identity: &Identity,
        order_id: OrderId,
        item_id: OrderItemId,
    ) -> Result<bool, CollaboratorError> {
        let links = self.links.read().map_err(|_| poisoned())?;
        Ok(links
            .get(&(identity.id, order_id))
            .is_some_and(|items| items.contains(&item_id)))
    }
}

#[cfg(test)]
mod tests {
    use bazaar_auth::Role;
    use bazaar_core::AddressId;

    use super::*;

    const SEED: &str = r#"{
        "users": [
            {
                "id": 5,
                "email": "carla@example.com",
                "role": "CONSUMER",
                "addresses": [{"id": 9}, {"id": 12}],
                "password_hash": "$argon2id$v=19$stub"
            },
            {"id": 7, "email": "tom@example.com", "role": "TRANSPORTER"}
        ],
        "order_links": [
            {"user_id": 5, "order_id": 10, "item_ids": [100, 101]},
            {"user_id": 7, "order_id": 10}
        ]
    }"#;

    #[tokio::test]
    async fn credentials_are_only_returned_on_request() {
        let dir = InMemoryDirectory::from_json(SEED).unwrap();

        let plain = dir.get_user_record(UserId::new(5), false).await.unwrap().unwrap();
        let full = dir.get_user_record(UserId::new(5), true).await.unwrap().unwrap();

        assert_eq!(plain.password_hash, None);
        assert!(full.password_hash.is_some());
        assert_eq!(plain.role, Role::Consumer);
        assert!(plain.into_identity().owns_address(AddressId::new(12)));
    }

    #[tokio::test]
    async fn missing_users_are_none() {
        let dir = InMemoryDirectory::from_json(SEED).unwrap();
        assert_eq!(dir.get_user_record(UserId::new(404), false).await.unwrap(), None);
    }

    #[tokio::test]
    async fn order_links_scope_items() {
        let dir = InMemoryDirectory::from_json(SEED).unwrap();
        let carla = Identity::new(UserId::new(5), Role::Consumer);
        let tom = Identity::new(UserId::new(7), Role::Transporter);
        let order = OrderId::new(10);

        assert!(dir.check_order_relationship(&carla, order).await.unwrap());
        assert!(dir.check_order_relationship(&tom, order).await.unwrap());
        assert!(!dir.check_order_relationship(&carla, OrderId::new(11)).await.unwrap());

        assert!(dir.check_order_item_relationship(&carla, order, OrderItemId::new(101)).await.unwrap());
        assert!(!dir.check_order_item_relationship(&tom, order, OrderItemId::new(101)).await.unwrap());
    }

    #[test]
    fn malformed_seed_is_an_error() {
        assert!(InMemoryDirectory::from_json(r#"{"users": [{"id": "x"}]}"#).is_err());
    }
}
