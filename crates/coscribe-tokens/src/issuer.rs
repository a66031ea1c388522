//! Token issuance and revocation.
//!
//! The issuer is the only component that creates credentials. It validates
//! issuance parameters, generates a fresh high-entropy secret, and persists
//! the record. The plaintext secret is returned to the caller exactly once,
//! on the issued credential; no listing operation ever exposes it again.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use coscribe_tokens::{MemoryTokenStore, ShareTokenParams, TokenIssuer};
//!
//! let store = Arc::new(MemoryTokenStore::new());
//! let issuer = TokenIssuer::new(store);
//!
//! let token = issuer.issue_api_token("import worker").await?;
//! println!("hand this out once: {}", token.secret);
//! ```

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::TokenResult;
use crate::config::TokenConfig;
use crate::error::TokenError;
use crate::secret::{generate_api_secret, generate_share_secret};
use crate::storage::TokenStore;
use crate::types::{ApiToken, ShareToken};

/// Parameters for issuing a share token.
#[derive(Debug, Clone)]
pub struct ShareTokenParams {
    /// Administrative label. Must be non-empty.
    pub name: String,
    /// Document the token grants access to. Must exist.
    pub document_id: Uuid,
    /// Write capability flag.
    pub can_write: bool,
    /// Optional expiry deadline. Must be strictly in the future if present.
    pub valid_until: Option<OffsetDateTime>,
}

/// Issues and revokes bearer credentials against a [`TokenStore`].
pub struct TokenIssuer {
    store: Arc<dyn TokenStore>,
    config: TokenConfig,
}

impl TokenIssuer {
    /// Creates an issuer with default configuration.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self::with_config(store, TokenConfig::default())
    }

    /// Creates an issuer with explicit configuration.
    #[must_use]
    pub fn with_config(store: Arc<dyn TokenStore>, config: TokenConfig) -> Self {
        Self { store, config }
    }

    /// Issues a new API token.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty name, `IssuanceFailed` if the
    /// retry budget is exhausted on secret conflicts, or `StoreUnavailable`
    /// on infrastructure failure.
    #[instrument(skip(self))]
    pub async fn issue_api_token(&self, name: &str) -> TokenResult<ApiToken> {
        for attempt in 1..=self.config.max_issue_attempts {
            let token = ApiToken::new(name, generate_api_secret())?;
            match self.store.create_api_token(&token).await {
                Ok(()) => {
                    debug!(id = %token.id, "issued api token");
                    return Ok(token);
                }
                Err(TokenError::DuplicateSecret) => {
                    warn!(attempt, "api secret collided, regenerating");
                }
                Err(err) => return Err(err),
            }
        }
        Err(TokenError::IssuanceFailed {
            attempts: self.config.max_issue_attempts,
        })
    }

    /// Issues a new share token for a document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty name or a deadline that is not
    /// strictly in the future, `NotFound` if the document does not exist,
    /// `IssuanceFailed` if the retry budget is exhausted on secret
    /// conflicts, or `StoreUnavailable` on infrastructure failure.
    #[instrument(skip(self, params), fields(document_id = %params.document_id))]
    pub async fn issue_share_token(&self, params: ShareTokenParams) -> TokenResult<ShareToken> {
        let now = OffsetDateTime::now_utc();
        for attempt in 1..=self.config.max_issue_attempts {
            let token = ShareToken::new(
                params.name.clone(),
                params.document_id,
                generate_share_secret(),
                params.can_write,
                params.valid_until,
                now,
            )?;
            match self.store.create_share_token(&token).await {
                Ok(()) => {
                    debug!(id = %token.id, can_write = token.can_write, "issued share token");
                    return Ok(token);
                }
                Err(TokenError::DuplicateSecret) => {
                    warn!(attempt, "share secret collided, regenerating");
                }
                Err(err) => return Err(err),
            }
        }
        Err(TokenError::IssuanceFailed {
            attempts: self.config.max_issue_attempts,
        })
    }

    /// Revokes an API token by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no token with this id exists, or
    /// `StoreUnavailable` on infrastructure failure.
    #[instrument(skip(self))]
    pub async fn revoke_api_token(&self, id: Uuid) -> TokenResult<()> {
        self.store.delete_api_token(id).await?;
        debug!(%id, "revoked api token");
        Ok(())
    }

    /// Revokes a share token by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no token with this id exists, or
    /// `StoreUnavailable` on infrastructure failure.
    #[instrument(skip(self))]
    pub async fn revoke_share_token(&self, id: Uuid) -> TokenResult<()> {
        self.store.delete_share_token(id).await?;
        debug!(%id, "revoked share token");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryTokenStore, TokenStore};
    use crate::types::{ApiTokenMetadata, ShareTokenMetadata};
    use std::sync::atomic::{AtomicU32, Ordering};
    use time::Duration;

    /// Store whose create operations report a secret collision for the
    /// first `collisions` calls, then succeed.
    struct CollidingStore {
        collisions: u32,
        create_calls: AtomicU32,
    }

    impl CollidingStore {
        fn new(collisions: u32) -> Self {
            Self {
                collisions,
                create_calls: AtomicU32::new(0),
            }
        }

        fn next_create(&self) -> TokenResult<()> {
            let call = self.create_calls.fetch_add(1, Ordering::SeqCst);
            if call < self.collisions {
                Err(TokenError::DuplicateSecret)
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl TokenStore for CollidingStore {
        async fn create_api_token(&self, _: &ApiToken) -> TokenResult<()> {
            self.next_create()
        }
        async fn create_share_token(&self, _: &ShareToken) -> TokenResult<()> {
            self.next_create()
        }
        async fn find_api_token(&self, _: &str) -> TokenResult<Option<ApiToken>> {
            Ok(None)
        }
        async fn find_share_token(&self, _: &str) -> TokenResult<Option<ShareToken>> {
            Ok(None)
        }
        async fn delete_api_token(&self, id: Uuid) -> TokenResult<()> {
            Err(TokenError::not_found(format!("api token {id}")))
        }
        async fn delete_share_token(&self, id: Uuid) -> TokenResult<()> {
            Err(TokenError::not_found(format!("share token {id}")))
        }
        async fn list_api_tokens(&self) -> TokenResult<Vec<ApiTokenMetadata>> {
            Ok(Vec::new())
        }
        async fn list_share_tokens(&self, _: Uuid) -> TokenResult<Vec<ShareTokenMetadata>> {
            Ok(Vec::new())
        }
        async fn purge_expired_share_tokens(&self, _: OffsetDateTime) -> TokenResult<u64> {
            Ok(0)
        }
    }

    fn issuer_with_store() -> (TokenIssuer, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::new());
        (TokenIssuer::new(store.clone()), store)
    }

    fn share_params(document_id: Uuid) -> ShareTokenParams {
        ShareTokenParams {
            name: "review link".to_string(),
            document_id,
            can_write: false,
            valid_until: None,
        }
    }

    #[tokio::test]
    async fn test_issue_api_token_persists_and_returns_secret_once() {
        let (issuer, store) = issuer_with_store();
        let token = issuer.issue_api_token("svc").await.unwrap();

        assert!(token.secret.starts_with("api_"));
        let found = store.find_api_token(&token.secret).await.unwrap().unwrap();
        assert_eq!(found.id, token.id);

        // Listing exposes metadata only.
        let listed = store.list_api_tokens().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, token.id);
    }

    #[tokio::test]
    async fn test_issue_api_token_rejects_empty_name() {
        let (issuer, _) = issuer_with_store();
        let err = issuer.issue_api_token("").await.unwrap_err();
        assert!(matches!(err, TokenError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_issued_secrets_are_distinct() {
        let (issuer, _) = issuer_with_store();
        let mut secrets = Vec::new();
        for _ in 0..20 {
            secrets.push(issuer.issue_api_token("svc").await.unwrap().secret);
        }
        let mut unique = secrets.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(secrets.len(), unique.len());
    }

    #[tokio::test]
    async fn test_concurrent_issuance_yields_distinct_secrets() {
        let store = Arc::new(MemoryTokenStore::new());
        let issuer = Arc::new(TokenIssuer::new(store));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let issuer = issuer.clone();
            handles.push(tokio::spawn(async move {
                issuer.issue_api_token("svc").await.unwrap().secret
            }));
        }

        let mut secrets = Vec::new();
        for handle in handles {
            secrets.push(handle.await.unwrap());
        }
        let mut unique = secrets.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(secrets.len(), unique.len());
    }

    #[tokio::test]
    async fn test_secret_collision_is_retried_with_fresh_secret() {
        let store = Arc::new(CollidingStore::new(1));
        let issuer = TokenIssuer::new(store.clone());

        let token = issuer.issue_api_token("svc").await.unwrap();
        assert!(token.secret.starts_with("api_"));
        // One collision plus one successful attempt.
        assert_eq!(store.create_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_collision_budget_exhaustion_fails_issuance() {
        let store = Arc::new(CollidingStore::new(u32::MAX));
        let issuer = TokenIssuer::new(store.clone());

        let err = issuer.issue_api_token("svc").await.unwrap_err();
        assert!(matches!(err, TokenError::IssuanceFailed { attempts: 3 }));
        assert_eq!(store.create_calls.load(Ordering::SeqCst), 3);

        let err = issuer
            .issue_share_token(share_params(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::IssuanceFailed { attempts: 3 }));
    }

    #[tokio::test]
    async fn test_collision_budget_is_configurable() {
        let store = Arc::new(CollidingStore::new(u32::MAX));
        let issuer = TokenIssuer::with_config(
            store.clone(),
            TokenConfig::default().with_max_issue_attempts(5),
        );

        let err = issuer.issue_api_token("svc").await.unwrap_err();
        assert!(matches!(err, TokenError::IssuanceFailed { attempts: 5 }));
        assert_eq!(store.create_calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_issue_share_token_requires_existing_document() {
        let (issuer, _) = issuer_with_store();
        let err = issuer
            .issue_share_token(share_params(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_issue_share_token_rejects_past_deadline() {
        let (issuer, store) = issuer_with_store();
        let doc = Uuid::new_v4();
        store.insert_document(doc).unwrap();

        let mut params = share_params(doc);
        params.valid_until = Some(OffsetDateTime::now_utc() - Duration::seconds(1));
        let err = issuer.issue_share_token(params).await.unwrap_err();
        assert!(matches!(err, TokenError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_issue_share_token_success() {
        let (issuer, store) = issuer_with_store();
        let doc = Uuid::new_v4();
        store.insert_document(doc).unwrap();

        let mut params = share_params(doc);
        params.can_write = true;
        params.valid_until = Some(OffsetDateTime::now_utc() + Duration::hours(1));
        let token = issuer.issue_share_token(params).await.unwrap();

        assert!(token.secret.starts_with("shr_"));
        assert_eq!(token.document_id, doc);
        assert!(token.can_write);
        assert!(store.find_share_token(&token.secret).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_revoke_then_lookup_misses() {
        let (issuer, store) = issuer_with_store();
        let doc = Uuid::new_v4();
        store.insert_document(doc).unwrap();

        let token = issuer.issue_share_token(share_params(doc)).await.unwrap();
        issuer.revoke_share_token(token.id).await.unwrap();

        assert!(store.find_share_token(&token.secret).await.unwrap().is_none());
        let err = issuer.revoke_share_token(token.id).await.unwrap_err();
        assert!(matches!(err, TokenError::NotFound { .. }));
    }
}
