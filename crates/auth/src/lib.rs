//! `bazaar-auth` — request-time authorization engine (fail closed).
//!
//! This crate is intentionally decoupled from HTTP and storage: methods and
//! route templates arrive as plain values, and identity/relationship lookups
//! go through the collaborator traits in [`ports`].

pub mod claims;
pub mod decision;
pub mod enforcement;
pub mod identity;
pub mod policy;
pub mod ports;
pub mod relationship;
pub mod resolver;
pub mod resource;
pub mod roles;
pub mod rules;

#[cfg(test)]
mod test_support;

pub use claims::{Hs256JwtValidator, JwtClaims, JwtValidator, TokenValidationError, validate_claims};
pub use decision::{Decision, DenialKind, Outcome};
pub use enforcement::{FORBIDDEN_MESSAGE, Rejection, RejectionBody, UNAUTHORIZED_MESSAGE, enforce};
pub use identity::{AddressRef, Identity, UserRecord};
pub use policy::{PolicyEvaluator, RouteContext, requests_administrator};
pub use ports::{CollaboratorError, IdentityStore, RelationshipOracle};
pub use relationship::RelationshipChecker;
pub use resolver::{AuthenticationError, IdentityResolver};
pub use resource::{ResourceKind, RouteTable, RouteTableError};
pub use roles::{Role, UnknownRole};
pub use rules::{Method, Rule, RuleTable, UnsupportedMethod};
