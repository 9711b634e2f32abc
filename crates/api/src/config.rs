//! Gateway configuration from environment variables.
//!
//! Route and rule tables are compiled in and deliberately not configurable.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const BIND_ADDR_ENV: &str = "BAZAAR_BIND_ADDR";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const BODY_LIMIT_ENV: &str = "BAZAAR_BODY_LIMIT";
pub const SEED_FILE_ENV: &str = "BAZAAR_SEED_FILE";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BAZAAR_BIND_ADDR is not a socket address: '{0}'")]
    InvalidBindAddr(String),

    #[error("BAZAAR_BODY_LIMIT is not a byte count: '{0}'")]
    InvalidBodyLimit(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Maximum request body buffered for payload-dependent rules.
    pub body_limit: usize,
    /// Optional JSON file seeding the in-memory identity and relationship data.
    pub seed_file: Option<PathBuf>,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let jwt_secret = lookup(JWT_SECRET_ENV).unwrap_or_else(|| {
            tracing::warn!("{JWT_SECRET_ENV} not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let body_limit = match lookup(BODY_LIMIT_ENV) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBodyLimit(raw.clone()))?,
            None => DEFAULT_BODY_LIMIT,
        };

        let seed_file = lookup(SEED_FILE_ENV)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_addr,
            jwt_secret,
            body_limit,
            seed_file,
        })
    }
}
