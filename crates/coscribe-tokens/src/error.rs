//! Token error types.
//!
//! This module defines all error types that can occur during credential
//! issuance, lookup, and revocation.
//!
//! Validation outcomes for bad tokens (`NotFound`, `Expired`,
//! `InsufficientScope`) are not errors: they are common, expected results
//! and are reported as [`crate::validator::Decision`] values. Errors here
//! cover bad issuance input, uniqueness conflicts, and infrastructure
//! faults.

/// Errors that can occur during token operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The requested record (or a referenced document) does not exist.
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was not found.
        message: String,
    },

    /// Issuance parameters are invalid.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of why the input is invalid.
        message: String,
    },

    /// A freshly generated secret collided with a stored one.
    ///
    /// Astronomically unlikely with 256-bit secrets, but surfaced by the
    /// store's uniqueness constraint and retried by the issuer.
    #[error("Duplicate token secret")]
    DuplicateSecret,

    /// The issuer exhausted its retry budget without persisting a token.
    #[error("Token issuance failed after {attempts} attempts")]
    IssuanceFailed {
        /// Number of attempts made.
        attempts: u32,
    },

    /// The store could not be consulted.
    ///
    /// Callers must treat this as "cannot authorize", never as authorized.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the infrastructure fault.
        message: String,
    },
}

impl TokenError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a new `StoreUnavailable` error.
    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Returns `true` if this error was caused by the caller's input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidInput { .. })
    }

    /// Returns `true` if this is an infrastructure fault.
    #[must_use]
    pub fn is_infrastructure_error(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. } | Self::IssuanceFailed { .. }
        )
    }

    /// Returns `true` if retrying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DuplicateSecret)
    }
}
