use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use bazaar_core::UserId;

use crate::{CollaboratorError, Identity, IdentityStore, JwtValidator, TokenValidationError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenValidationError),

    #[error("token subject {0} does not exist")]
    UnknownUser(UserId),

    #[error(transparent)]
    Store(#[from] CollaboratorError),
}

/// Resolves a bearer credential to a fresh identity snapshot.
///
/// The token only proves *who* the caller is; role and owned addresses are
/// always read from the identity store so revocations apply immediately.
#[derive(Clone)]
pub struct IdentityResolver {
    validator: Arc<dyn JwtValidator>,
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    pub fn new(validator: Arc<dyn JwtValidator>, store: Arc<dyn IdentityStore>) -> Self {
        Self { validator, store }
    }

    pub async fn resolve_from_token(&self, token: &str) -> Result<Identity, AuthenticationError> {
        self.resolve_from_token_at(token, Utc::now()).await
    }

    pub async fn resolve_from_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthenticationError> {
        let claims = self.validator.validate(token, now)?;

        let record = self
            .store
            .get_user_record(claims.sub, false)
            .await?
            .ok_or(AuthenticationError::UnknownUser(claims.sub))?;

        if record.role != claims.role {
            tracing::debug!(
                user_id = %record.id,
                token_role = %claims.role,
                current_role = %record.role,
                "token role is stale; using stored role"
            );
        }

        Ok(record.into_identity())
    }
}
