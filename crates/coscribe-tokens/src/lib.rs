//! # coscribe-tokens
//!
//! Credential issuance and validation for the Coscribe document service.
//!
//! This crate provides:
//! - Account-less bearer credentials: service-wide API tokens and
//!   per-document share tokens
//! - Cryptographically secure secret generation with uniqueness enforcement
//! - Expiry evaluation with an injectable clock
//! - Capability-scoped authorization decisions (read vs. write)
//!
//! ## Overview
//!
//! A caller presents an opaque secret string; the validator resolves it
//! against a [`storage::TokenStore`], applies the expiry policy, and returns
//! a typed [`Decision`]. Bad tokens are expected outcomes, not faults: only
//! infrastructure failures surface as errors, and those are treated as
//! "cannot authorize" (fail closed).
//!
//! ## Modules
//!
//! - [`config`] - Issuance configuration
//! - [`error`] - Error taxonomy
//! - [`expiry`] - Pure expiry policy
//! - [`issuer`] - Token issuance and revocation
//! - [`secret`] - Secret generation
//! - [`storage`] - Storage trait and in-memory implementation
//! - [`types`] - Credential domain types
//! - [`validator`] - Authorization decisions

pub mod config;
pub mod error;
pub mod expiry;
pub mod issuer;
pub mod secret;
pub mod storage;
pub mod types;
pub mod validator;

pub use config::TokenConfig;
pub use error::TokenError;
pub use issuer::{ShareTokenParams, TokenIssuer};
pub use storage::{MemoryTokenStore, TokenStore};
pub use types::{
    ApiToken, ApiTokenMetadata, Capability, ShareToken, ShareTokenMetadata, TokenKind,
};
pub use validator::{Decision, Grant, TokenValidator};

/// Type alias for token operation results.
pub type TokenResult<T> = Result<T, TokenError>;
