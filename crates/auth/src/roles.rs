use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Platform role of an account.
///
/// Every account holds exactly one role. The wire names are the upper-case
/// strings used in request bodies (`"type": "ADMINISTRATOR"`) and token claims.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Consumer,
    Supplier,
    Transporter,
    Administrator,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Consumer,
        Role::Supplier,
        Role::Transporter,
        Role::Administrator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Consumer => "CONSUMER",
            Role::Supplier => "SUPPLIER",
            Role::Transporter => "TRANSPORTER",
            Role::Administrator => "ADMINISTRATOR",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("administrator".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_upper_case_names() {
        let json = serde_json::to_string(&Role::Transporter).unwrap();
        assert_eq!(json, "\"TRANSPORTER\"");
    }
}
