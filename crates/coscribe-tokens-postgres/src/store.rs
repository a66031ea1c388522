//! Token storage over PostgreSQL.
//!
//! Typed columns per table, no JSON blobs: the schema is the contract the
//! migration chain deploys. Uniqueness and referential integrity are
//! enforced by the database, not checked client-side, so concurrent
//! issuance cannot race past them.

use async_trait::async_trait;
use coscribe_tokens::error::TokenError;
use coscribe_tokens::storage::TokenStore;
use coscribe_tokens::types::{ApiToken, ApiTokenMetadata, ShareToken, ShareTokenMetadata};
use coscribe_tokens::TokenResult;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{PgPool, is_foreign_key_violation, is_unique_violation, store_fault};

/// PostgreSQL-backed [`TokenStore`].
pub struct PostgresTokenStore {
    pool: PgPool,
}

impl PostgresTokenStore {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool, e.g. for running migrations.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TokenStore for PostgresTokenStore {
    #[instrument(skip(self, token), fields(id = %token.id))]
    async fn create_api_token(&self, token: &ApiToken) -> TokenResult<()> {
        query(
            r#"
            INSERT INTO apitoken (id, name, token)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token.id)
        .bind(&token.name)
        .bind(&token.secret)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return TokenError::DuplicateSecret;
            }
            store_fault(e)
        })?;

        debug!("stored api token");
        Ok(())
    }

    #[instrument(skip(self, token), fields(id = %token.id, document_id = %token.document_id))]
    async fn create_share_token(&self, token: &ShareToken) -> TokenResult<()> {
        query(
            r#"
            INSERT INTO documentsharetoken (id, name, document_id, token, can_write, valid_until)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.id)
        .bind(&token.name)
        .bind(token.document_id)
        .bind(&token.secret)
        .bind(token.can_write)
        .bind(token.valid_until)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return TokenError::DuplicateSecret;
            }
            if is_foreign_key_violation(&e) {
                return TokenError::not_found(format!("document {}", token.document_id));
            }
            store_fault(e)
        })?;

        debug!("stored share token");
        Ok(())
    }

    async fn find_api_token(&self, secret: &str) -> TokenResult<Option<ApiToken>> {
        let row: Option<(Uuid, String, String)> = query_as(
            r#"
            SELECT id, name, token
            FROM apitoken
            WHERE token = $1
            "#,
        )
        .bind(secret)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_fault)?;

        Ok(row.map(|(id, name, secret)| ApiToken { id, name, secret }))
    }

    async fn find_share_token(&self, secret: &str) -> TokenResult<Option<ShareToken>> {
        let row: Option<(Uuid, String, Uuid, String, bool, Option<OffsetDateTime>)> = query_as(
            r#"
            SELECT id, name, document_id, token, can_write, valid_until
            FROM documentsharetoken
            WHERE token = $1
            "#,
        )
        .bind(secret)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_fault)?;

        Ok(row.map(
            |(id, name, document_id, secret, can_write, valid_until)| ShareToken {
                id,
                name,
                document_id,
                secret,
                can_write,
                valid_until,
            },
        ))
    }

    #[instrument(skip(self))]
    async fn delete_api_token(&self, id: Uuid) -> TokenResult<()> {
        let result = query("DELETE FROM apitoken WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_fault)?;

        if result.rows_affected() == 0 {
            return Err(TokenError::not_found(format!("api token {id}")));
        }
        debug!("deleted api token");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_share_token(&self, id: Uuid) -> TokenResult<()> {
        let result = query("DELETE FROM documentsharetoken WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_fault)?;

        if result.rows_affected() == 0 {
            return Err(TokenError::not_found(format!("share token {id}")));
        }
        debug!("deleted share token");
        Ok(())
    }

    async fn list_api_tokens(&self) -> TokenResult<Vec<ApiTokenMetadata>> {
        let rows: Vec<(Uuid, String)> = query_as(
            r#"
            SELECT id, name
            FROM apitoken
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_fault)?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| ApiTokenMetadata { id, name })
            .collect())
    }

    async fn list_share_tokens(&self, document_id: Uuid) -> TokenResult<Vec<ShareTokenMetadata>> {
        let rows: Vec<(Uuid, String, Uuid, bool, Option<OffsetDateTime>)> = query_as(
            r#"
            SELECT id, name, document_id, can_write, valid_until
            FROM documentsharetoken
            WHERE document_id = $1
            ORDER BY name
            "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_fault)?;

        Ok(rows
            .into_iter()
            .map(
                |(id, name, document_id, can_write, valid_until)| ShareTokenMetadata {
                    id,
                    name,
                    document_id,
                    can_write,
                    valid_until,
                },
            )
            .collect())
    }

    #[instrument(skip(self))]
    async fn purge_expired_share_tokens(&self, now: OffsetDateTime) -> TokenResult<u64> {
        let result = query(
            r#"
            DELETE FROM documentsharetoken
            WHERE valid_until IS NOT NULL
              AND valid_until <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(store_fault)?;

        let purged = result.rows_affected();
        if purged > 0 {
            debug!(purged, "purged expired share tokens");
        }
        Ok(purged)
    }
}
