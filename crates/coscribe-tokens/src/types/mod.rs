//! Credential domain types.
//!
//! Two kinds of bearer credential exist:
//!
//! - [`ApiToken`] - service-level, full trust, no scoping
//! - [`ShareToken`] - scoped to one document, read or read/write,
//!   optionally time-bound
//!
//! Both are immutable once issued; rotation is modeled as delete + reissue.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod api_token;
pub mod share_token;

pub use api_token::{ApiToken, ApiTokenMetadata};
pub use share_token::{ShareToken, ShareTokenMetadata};

/// The kind of credential a secret string claims to be.
///
/// Lookup is always kind-qualified: an API secret presented as a share
/// token (or vice versa) resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Service-level API token.
    Api,
    /// Per-document share token.
    Share,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => write!(f, "api"),
            Self::Share => write!(f, "share"),
        }
    }
}

/// Coarse permission level a credential carries or a caller requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Read-only access.
    Read,
    /// Read and write access.
    Write,
}

impl Capability {
    /// Returns `true` if a credential carrying `self` satisfies a caller
    /// requiring `required`.
    ///
    /// Write capability is a superset of read.
    #[must_use]
    pub fn satisfies(self, required: Capability) -> bool {
        match (self, required) {
            (Self::Write, _) | (Self::Read, Self::Read) => true,
            (Self::Read, Self::Write) => false,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}
