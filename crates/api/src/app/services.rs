//! Collaborator wiring: builds the access-control state from configuration.

use std::sync::Arc;

use bazaar_auth::{
    Hs256JwtValidator, IdentityResolver, IdentityStore, PolicyEvaluator, RelationshipOracle,
};

use crate::app::directory::InMemoryDirectory;
use crate::config::GatewayConfig;
use crate::middleware::AccessState;

/// Wire the gate over in-memory collaborators, seeded from the configured file.
pub fn build_state(config: &GatewayConfig) -> anyhow::Result<AccessState> {
    let directory = match &config.seed_file {
        Some(path) => {
            let directory = InMemoryDirectory::from_file(path)?;
            tracing::info!(seed = %path.display(), "loaded directory seed");
            directory
        }
        None => {
            tracing::warn!("no seed file configured; directory is empty");
            InMemoryDirectory::new()
        }
    };

    let directory = Arc::new(directory);
    Ok(access_state(config, directory.clone(), directory))
}

/// Wire the gate over arbitrary collaborators.
pub fn access_state(
    config: &GatewayConfig,
    store: Arc<dyn IdentityStore>,
    oracle: Arc<dyn RelationshipOracle>,
) -> AccessState {
    let validator = Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    let resolver = IdentityResolver::new(validator, store);
    let policy = PolicyEvaluator::standard(oracle);

    AccessState {
        resolver: Arc::new(resolver),
        policy: Arc::new(policy),
        body_limit: config.body_limit,
    }
}
