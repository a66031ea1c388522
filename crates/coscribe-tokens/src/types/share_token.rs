//! Share token domain type.
//!
//! Share tokens grant access to exactly one document, at read or
//! read/write level, optionally until a deadline. They exist so a document
//! owner can hand out access without anyone creating an account.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::TokenResult;
use crate::error::TokenError;
use crate::expiry;
use crate::types::Capability;

/// A per-document share token.
///
/// Immutable once issued. The referenced document must exist at creation
/// time; if the document is later deleted the token is invalidated with it.
#[derive(Debug, Clone)]
pub struct ShareToken {
    /// Stable identity, assigned once at issuance. Revocation targets this.
    pub id: Uuid,

    /// Human-readable label for administrative display. Not unique.
    pub name: String,

    /// The document this token grants access to.
    pub document_id: Uuid,

    /// The secret bearer string. Unique across all share tokens.
    pub secret: String,

    /// `false` = read-only, `true` = read and write.
    pub can_write: bool,

    /// Expiry deadline. `None` means the token never expires by time and
    /// remains valid until explicitly deleted.
    pub valid_until: Option<OffsetDateTime>,
}

impl ShareToken {
    /// Creates a new share token with a fresh identity.
    ///
    /// `now` is the issuance clock; a `valid_until` in the past or at
    /// `now` exactly is rejected, since the token would be born expired.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `name` is empty or `valid_until` is not
    /// strictly in the future.
    pub fn new(
        name: impl Into<String>,
        document_id: Uuid,
        secret: impl Into<String>,
        can_write: bool,
        valid_until: Option<OffsetDateTime>,
        now: OffsetDateTime,
    ) -> TokenResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TokenError::invalid_input("token name must not be empty"));
        }
        if let Some(deadline) = valid_until
            && deadline <= now
        {
            return Err(TokenError::invalid_input(
                "valid_until must be strictly in the future",
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            document_id,
            secret: secret.into(),
            can_write,
            valid_until,
        })
    }

    /// The capability this token carries.
    #[must_use]
    pub fn capability(&self) -> Capability {
        if self.can_write {
            Capability::Write
        } else {
            Capability::Read
        }
    }

    /// Returns `true` if this token is expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        expiry::is_expired(self.valid_until, now)
    }

    /// Returns the listable projection of this token, without the secret.
    #[must_use]
    pub fn metadata(&self) -> ShareTokenMetadata {
        ShareTokenMetadata {
            id: self.id,
            name: self.name.clone(),
            document_id: self.document_id,
            can_write: self.can_write,
            valid_until: self.valid_until,
        }
    }
}

/// Non-secret projection of a [`ShareToken`], safe to list and serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareTokenMetadata {
    /// Token identity.
    pub id: Uuid,
    /// Administrative label.
    pub name: String,
    /// The document this token grants access to.
    pub document_id: Uuid,
    /// Write capability flag.
    pub can_write: bool,
    /// Expiry deadline, if any.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub valid_until: Option<OffsetDateTime>,
}
