//! Decision enforcement: the only place a [`Decision`] becomes a rejection.
//!
//! Every denial produces the same rejection regardless of which rule failed,
//! so responses never reveal whether the targeted resource exists.

use serde::Serialize;
use thiserror::Error;

use crate::{Decision, Identity};

pub const UNAUTHORIZED_MESSAGE: &str = "Invalid token. Unauthorized access.";
pub const FORBIDDEN_MESSAGE: &str = "Insufficient permissions for specified resource.";

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Missing or invalid bearer credential where one is required.
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    /// Any policy denial.
    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,
}

/// Uniform JSON body of a rejection.
#[derive(Debug, Clone, Serialize)]
pub struct RejectionBody {
    pub message: &'static str,
}

impl Rejection {
    pub fn status(&self) -> u16 {
        match self {
            Rejection::Unauthorized => 401,
            Rejection::Forbidden => 403,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rejection::Unauthorized => UNAUTHORIZED_MESSAGE,
            Rejection::Forbidden => FORBIDDEN_MESSAGE,
        }
    }

    pub fn body(&self) -> RejectionBody {
        RejectionBody {
            message: self.message(),
        }
    }
}

/// Allow passes the caller through to the downstream handler; deny rejects.
pub fn enforce(decision: &Decision, caller: Option<Identity>) -> Result<Option<Identity>, Rejection> {
    if decision.is_allowed() {
        Ok(caller)
    } else {
        Err(Rejection::Forbidden)
    }
}
