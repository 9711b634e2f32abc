use serde::{Deserialize, Serialize};

use bazaar_core::{AddressId, UserId};

use crate::Role;

/// Reference to an address owned by an account.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressRef {
    pub id: AddressId,
}

/// Resolved caller identity used for authorization decisions.
///
/// This is a request-scoped snapshot of the identity store. The policy layer
/// reads it and never mutates it; it is not cached across requests since role
/// and ownership may change between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub role: Role,
    pub addresses: Vec<AddressRef>,
}

impl Identity {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            addresses: Vec::new(),
        }
    }

    pub fn with_addresses(mut self, addresses: impl IntoIterator<Item = AddressId>) -> Self {
        self.addresses = addresses.into_iter().map(|id| AddressRef { id }).collect();
        self
    }

    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }

    pub fn owns_address(&self, address_id: AddressId) -> bool {
        self.addresses.iter().any(|a| a.id == address_id)
    }
}

/// Account record as held by the identity store.
///
/// `password_hash` is only populated when the store was asked for credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub addresses: Vec<AddressRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl UserRecord {
    /// Drop credentials and keep the attributes the policy layer needs.
    pub fn into_identity(self) -> Identity {
        Identity {
            id: self.id,
            role: self.role,
            addresses: self.addresses,
        }
    }

    pub fn without_credentials(mut self) -> Self {
        self.password_hash = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_membership_checks_owned_ids_only() {
        let caller = Identity::new(UserId::new(5), Role::Consumer)
            .with_addresses([AddressId::new(9), AddressId::new(12)]);

        assert!(caller.owns_address(AddressId::new(9)));
        assert!(caller.owns_address(AddressId::new(12)));
        assert!(!caller.owns_address(AddressId::new(99)));
    }

    #[test]
    fn record_to_identity_drops_credentials() {
        let record = UserRecord {
            id: UserId::new(1),
            email: "ada@example.com".to_string(),
            role: Role::Supplier,
            addresses: vec![AddressRef { id: AddressId::new(3) }],
            password_hash: Some("$argon2id$...".to_string()),
        };

        let identity = record.into_identity();
        assert_eq!(identity.role, Role::Supplier);
        assert!(identity.owns_address(AddressId::new(3)));
    }
}
