//! API token domain type.
//!
//! API tokens are service-level credentials: possession is full trust and
//! there is no scoping field. They are issued to trusted automation (import
//! pipelines, workers) rather than end users.

use serde::Serialize;
use uuid::Uuid;

use crate::TokenResult;
use crate::error::TokenError;

/// A service-level API token.
///
/// The `secret` field holds the plaintext bearer string. It is handed to
/// the issuing caller exactly once and never appears in any listing; only
/// [`ApiTokenMetadata`] is serializable.
#[derive(Debug, Clone)]
pub struct ApiToken {
    /// Stable identity, assigned once at issuance. Revocation targets this.
    pub id: Uuid,

    /// Human-readable label for administrative display. Not unique.
    pub name: String,

    /// The secret bearer string. Unique across all API tokens.
    pub secret: String,
}

impl ApiToken {
    /// Creates a new API token with a fresh identity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `name` is empty.
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> TokenResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TokenError::invalid_input("token name must not be empty"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            secret: secret.into(),
        })
    }

    /// Returns the listable projection of this token, without the secret.
    #[must_use]
    pub fn metadata(&self) -> ApiTokenMetadata {
        ApiTokenMetadata {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Non-secret projection of an [`ApiToken`], safe to list and serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTokenMetadata {
    /// Token identity.
    pub id: Uuid,
    /// Administrative label.
    pub name: String,
}
