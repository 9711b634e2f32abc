use bazaar_auth::{Identity, ResourceKind};

/// Request context attached by the access-control middleware after an allow.
///
/// `identity` is absent only for routes that admit anonymous callers
/// (self-registration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    identity: Option<Identity>,
    resource_kind: ResourceKind,
}

impl CallerContext {
    pub fn new(identity: Option<Identity>, resource_kind: ResourceKind) -> Self {
        Self {
            identity,
            resource_kind,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn resource_kind(&self) -> ResourceKind {
        self.resource_kind
    }
}
