//! Token validation.
//!
//! The validator is the gate between arbitrary network callers and
//! document content. Given a presented secret, a kind, and the capability
//! the caller needs, it returns a terminal [`Decision`].
//!
//! Bad tokens are expected, common outcomes and never raised as errors;
//! only infrastructure faults (`StoreUnavailable`) propagate, and the
//! caller must treat those as "cannot authorize" (fail closed).
//!
//! For share tokens, expiry is evaluated before capability: an expired
//! token yields `Expired` regardless of what it could do, so expired
//! credentials leak no capability information.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::TokenResult;
use crate::storage::TokenStore;
use crate::types::{Capability, TokenKind};

/// Terminal outcome of a validation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The credential is valid and satisfies the required capability.
    Valid(Grant),
    /// No credential with this secret and kind exists.
    NotFound,
    /// The credential exists but its deadline has passed.
    Expired,
    /// The credential exists and is current, but cannot write.
    InsufficientScope,
}

impl Decision {
    /// Returns `true` if access is granted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Non-secret metadata attached to a granted decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Full-trust service access via an API token.
    Service {
        /// Identity of the granting token, for request attribution.
        token_id: Uuid,
    },
    /// Scoped access to one document via a share token.
    Document {
        /// The document the caller may access.
        document_id: Uuid,
        /// Whether the caller may mutate it.
        can_write: bool,
    },
}

/// Validates presented secrets against a [`TokenStore`].
///
/// Stateless and safe to share across request handlers; every call is a
/// read-only lookup.
pub struct TokenValidator {
    store: Arc<dyn TokenStore>,
}

impl TokenValidator {
    /// Creates a validator over a store handle.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Validates a presented secret against the current clock.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be consulted.
    pub async fn validate(
        &self,
        secret: &str,
        kind: TokenKind,
        required: Capability,
    ) -> TokenResult<Decision> {
        self.validate_at(secret, kind, required, OffsetDateTime::now_utc())
            .await
    }

    /// Validates a presented secret at an explicit instant.
    ///
    /// The clock is injected so expiry behavior is deterministic under
    /// test; production callers use [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be consulted.
    #[instrument(skip(self, secret), fields(%kind, %required))]
    pub async fn validate_at(
        &self,
        secret: &str,
        kind: TokenKind,
        required: Capability,
        now: OffsetDateTime,
    ) -> TokenResult<Decision> {
        match kind {
            TokenKind::Api => {
                // API tokens are unscoped: possession satisfies any
                // capability requirement.
                let Some(token) = self.store.find_api_token(secret).await? else {
                    debug!("api token not found");
                    return Ok(Decision::NotFound);
                };
                debug!(token_id = %token.id, "api token valid");
                Ok(Decision::Valid(Grant::Service { token_id: token.id }))
            }
            TokenKind::Share => {
                let Some(token) = self.store.find_share_token(secret).await? else {
                    debug!("share token not found");
                    return Ok(Decision::NotFound);
                };
                if token.is_expired_at(now) {
                    debug!(token_id = %token.id, "share token expired");
                    return Ok(Decision::Expired);
                }
                if !token.capability().satisfies(required) {
                    debug!(token_id = %token.id, "share token lacks required capability");
                    return Ok(Decision::InsufficientScope);
                }
                debug!(token_id = %token.id, "share token valid");
                Ok(Decision::Valid(Grant::Document {
                    document_id: token.document_id,
                    can_write: token.can_write,
                }))
            }
        }
    }
}
