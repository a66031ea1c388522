//! In-memory token store.
//!
//! Backs the core test suite and small embedded deployments. Credentials
//! are keyed by secret in hash maps, which gives the same exact-match
//! lookup discipline as the UNIQUE index in the PostgreSQL backend: no
//! code path compares secret strings byte by byte.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::TokenResult;
use crate::error::TokenError;
use crate::storage::TokenStore;
use crate::types::{ApiToken, ApiTokenMetadata, ShareToken, ShareTokenMetadata};

/// In-memory [`TokenStore`] implementation.
///
/// Referential integrity for share tokens is kept through a registered
/// document set: creating a share token requires the document to be
/// registered, and removing a document cascades to its tokens.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    api: RwLock<HashMap<String, ApiToken>>,
    share: RwLock<HashMap<String, ShareToken>>,
    documents: RwLock<HashSet<Uuid>>,
}

impl MemoryTokenStore {
    /// Creates an empty store with no registered documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document so share tokens can reference it.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store's lock is poisoned.
    pub fn insert_document(&self, document_id: Uuid) -> TokenResult<()> {
        self.documents
            .write()
            .map_err(poisoned)?
            .insert(document_id);
        Ok(())
    }

    /// Removes a document and cascades to its share tokens.
    ///
    /// Tokens referencing the document disappear from lookup, mirroring
    /// the `ON DELETE CASCADE` behavior of the PostgreSQL backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store's lock is poisoned.
    pub fn remove_document(&self, document_id: Uuid) -> TokenResult<()> {
        // Lock order is documents then share, same as create_share_token,
        // and both guards stay held so the removal and the cascade are one
        // atomic step.
        let mut documents = self.documents.write().map_err(poisoned)?;
        let mut share = self.share.write().map_err(poisoned)?;
        documents.remove(&document_id);
        share.retain(|_, token| token.document_id != document_id);
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> TokenError {
    TokenError::store_unavailable("memory store lock poisoned")
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn create_api_token(&self, token: &ApiToken) -> TokenResult<()> {
        let mut api = self.api.write().map_err(poisoned)?;
        if api.contains_key(&token.secret) {
            return Err(TokenError::DuplicateSecret);
        }
        api.insert(token.secret.clone(), token.clone());
        Ok(())
    }

    async fn create_share_token(&self, token: &ShareToken) -> TokenResult<()> {
        // The documents guard must stay held across the insert: released
        // early, a concurrent remove_document could delete the document and
        // cascade between the existence check and the insert, leaving an
        // orphan token that still resolves. Lock order is documents then
        // share, matching remove_document.
        let documents = self.documents.read().map_err(poisoned)?;
        if !documents.contains(&token.document_id) {
            return Err(TokenError::not_found(format!(
                "document {}",
                token.document_id
            )));
        }
        let mut share = self.share.write().map_err(poisoned)?;
        if share.contains_key(&token.secret) {
            return Err(TokenError::DuplicateSecret);
        }
        share.insert(token.secret.clone(), token.clone());
        Ok(())
    }

    async fn find_api_token(&self, secret: &str) -> TokenResult<Option<ApiToken>> {
        Ok(self.api.read().map_err(poisoned)?.get(secret).cloned())
    }

    async fn find_share_token(&self, secret: &str) -> TokenResult<Option<ShareToken>> {
        Ok(self.share.read().map_err(poisoned)?.get(secret).cloned())
    }

    async fn delete_api_token(&self, id: Uuid) -> TokenResult<()> {
        let mut api = self.api.write().map_err(poisoned)?;
        let secret = api
            .values()
            .find(|token| token.id == id)
            .map(|token| token.secret.clone());
        match secret {
            Some(secret) => {
                api.remove(&secret);
                Ok(())
            }
            None => Err(TokenError::not_found(format!("api token {id}"))),
        }
    }

    async fn delete_share_token(&self, id: Uuid) -> TokenResult<()> {
        let mut share = self.share.write().map_err(poisoned)?;
        let secret = share
            .values()
            .find(|token| token.id == id)
            .map(|token| token.secret.clone());
        match secret {
            Some(secret) => {
                share.remove(&secret);
                Ok(())
            }
            None => Err(TokenError::not_found(format!("share token {id}"))),
        }
    }

    async fn list_api_tokens(&self) -> TokenResult<Vec<ApiTokenMetadata>> {
        let mut tokens: Vec<ApiTokenMetadata> = self
            .api
            .read()
            .map_err(poisoned)?
            .values()
            .map(ApiToken::metadata)
            .collect();
        tokens.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tokens)
    }

    async fn list_share_tokens(&self, document_id: Uuid) -> TokenResult<Vec<ShareTokenMetadata>> {
        let mut tokens: Vec<ShareTokenMetadata> = self
            .share
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|token| token.document_id == document_id)
            .map(ShareToken::metadata)
            .collect();
        tokens.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tokens)
    }

    async fn purge_expired_share_tokens(&self, now: OffsetDateTime) -> TokenResult<u64> {
        let mut share = self.share.write().map_err(poisoned)?;
        let before = share.len();
        share.retain(|_, token| !token.is_expired_at(now));
        Ok((before - share.len()) as u64)
    }
}
