//! Token storage trait.
//!
//! This module defines the persistence interface over the two credential
//! tables (API tokens and document share tokens).
//!
//! # Security Considerations
//!
//! - Secrets are resolved by exact-match keyed lookup (hash map key or
//!   UNIQUE index), never by scanning and comparing strings, so lookup
//!   timing does not depend on how much of a presented secret matches a
//!   stored one
//! - Uniqueness is enforced atomically by the store itself; two concurrent
//!   creations with the same secret must not both succeed
//! - Listing operations return metadata projections only, never secrets
//!
//! # Implementations
//!
//! - [`MemoryTokenStore`] in this crate, for tests and embedded use
//! - `coscribe-tokens-postgres` - PostgreSQL storage backend

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::TokenResult;
use crate::types::{ApiToken, ApiTokenMetadata, ShareToken, ShareTokenMetadata};

pub mod memory;

pub use memory::MemoryTokenStore;

/// Storage trait for bearer credentials.
///
/// Validation is the hot path: `find_*` is invoked on every authorized
/// request and must be indexed by secret. Creation and deletion are rare.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persists a new API token.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSecret` if a token with the same secret already
    /// exists (enforced atomically), or `StoreUnavailable` on
    /// infrastructure failure.
    async fn create_api_token(&self, token: &ApiToken) -> TokenResult<()>;

    /// Persists a new share token.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the referenced document does not exist,
    /// `DuplicateSecret` on a secret conflict, or `StoreUnavailable` on
    /// infrastructure failure.
    async fn create_share_token(&self, token: &ShareToken) -> TokenResult<()>;

    /// Finds an API token by its secret.
    ///
    /// Returns `None` when no such token exists; that is an expected
    /// outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` on infrastructure failure.
    async fn find_api_token(&self, secret: &str) -> TokenResult<Option<ApiToken>>;

    /// Finds a share token by its secret.
    ///
    /// Tokens whose document has been deleted are gone from the store
    /// (deletion cascades), so they resolve to `None`. Expiry is not
    /// evaluated here; callers apply the expiry policy.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` on infrastructure failure.
    async fn find_share_token(&self, secret: &str) -> TokenResult<Option<ShareToken>>;

    /// Deletes (revokes) an API token by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no token with this id exists, or
    /// `StoreUnavailable` on infrastructure failure.
    async fn delete_api_token(&self, id: Uuid) -> TokenResult<()>;

    /// Deletes (revokes) a share token by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no token with this id exists, or
    /// `StoreUnavailable` on infrastructure failure.
    async fn delete_share_token(&self, id: Uuid) -> TokenResult<()>;

    /// Lists metadata for all API tokens.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` on infrastructure failure.
    async fn list_api_tokens(&self) -> TokenResult<Vec<ApiTokenMetadata>>;

    /// Lists metadata for all share tokens of one document.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` on infrastructure failure.
    async fn list_share_tokens(&self, document_id: Uuid) -> TokenResult<Vec<ShareTokenMetadata>>;

    /// Deletes share tokens whose deadline has passed at `now`.
    ///
    /// Maintenance sweep; expired tokens already validate as `Expired`
    /// whether or not this has run. Returns the number of tokens removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` on infrastructure failure.
    async fn purge_expired_share_tokens(&self, now: OffsetDateTime) -> TokenResult<u64>;
}
