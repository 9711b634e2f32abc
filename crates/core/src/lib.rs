//! `bazaar-core` — domain foundation shared by the gateway crates.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{AddressId, OrderId, OrderItemId, UserId};
