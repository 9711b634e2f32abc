//! Counting in-memory collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use bazaar_core::{OrderId, OrderItemId, UserId};

use crate::{CollaboratorError, Identity, IdentityStore, RelationshipOracle, UserRecord};

#[derive(Default)]
struct Inner {
    users: Mutex<HashMap<UserId, Identity>>,
    order_links: Mutex<HashSet<(UserId, OrderId)>>,
    item_links: Mutex<HashSet<(UserId, OrderId, OrderItemId)>>,
    fail: bool,
    lookups: AtomicUsize,
    credential_requests: AtomicUsize,
    order_checks: AtomicUsize,
    item_checks: AtomicUsize,
}

#[derive(Clone, Default)]
pub(crate) struct StubDirectory {
    inner: Arc<Inner>,
}

impl StubDirectory {
    pub(crate) fn failing() -> Self {
        Self {
            inner: Arc::new(Inner {
                fail: true,
                ..Default::default()
            }),
        }
    }

    pub(crate) fn with_user(self, identity: Identity) -> Self {
        self.inner.users.lock().unwrap().insert(identity.id, identity);
        self
    }

    pub(crate) fn with_order(self, user: i64, order: i64) -> Self {
        self.inner
            .order_links
            .lock()
            .unwrap()
            .insert((UserId::new(user), OrderId::new(order)));
        self
    }

    pub(crate) fn with_order_item(self, user: i64, order: i64, item: i64) -> Self {
        self.inner.item_links.lock().unwrap().insert((
            UserId::new(user),
            OrderId::new(order),
            OrderItemId::new(item),
        ));
        self
    }

    pub(crate) fn lookups(&self) -> usize {
        self.inner.lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn credential_requests(&self) -> usize {
        self.inner.credential_requests.load(Ordering::SeqCst)
    }

    pub(crate) fn order_checks(&self) -> usize {
        self.inner.order_checks.load(Ordering::SeqCst)
    }

    pub(crate) fn item_checks(&self) -> usize {
        self.inner.item_checks.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), CollaboratorError> {
        if self.inner.fail {
            return Err(CollaboratorError::new("stub", "connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for StubDirectory {
    async fn get_user_record(
        &self,
        id: UserId,
        include_credentials: bool,
    ) -> Result<Option<UserRecord>, CollaboratorError> {
        self.inner.lookups.fetch_add(1, Ordering::SeqCst);
        if include_credentials {
            self.inner.credential_requests.fetch_add(1, Ordering::SeqCst);
        }
        self.check_failure()?;

        let users = self.inner.users.lock().unwrap();
        Ok(users.get(&id).map(|identity| UserRecord {
            id: identity.id,
            email: format!("user{}@example.com", identity.id),
            role: identity.role,
            addresses: identity.addresses.clone(),
            password_hash: None,
        }))
    }
}

#[async_trait]
impl RelationshipOracle for StubDirectory {
    async fn check_order_relationship(
        &self,
        identity: &Identity,
        order_id: OrderId,
    ) -> Result<bool, CollaboratorError> {
        self.inner.order_checks.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .inner
            .order_links
            .lock()
            .unwrap()
            .contains(&(identity.id, order_id)))
    }

    async fn check_order_item_relationship(
        &self,
        identity: &Identity,
        order_id: OrderId,
        item_id: OrderItemId,
    ) -> Result<bool, CollaboratorError> {
        self.inner.item_checks.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .inner
            .item_links
            .lock()
            .unwrap()
            .contains(&(identity.id, order_id, item_id)))
    }
}
