//! Secret generation for bearer credentials.
//!
//! # Security
//!
//! - Secrets carry 256 bits of randomness (32 bytes), well above the
//!   128-bit floor needed to make brute-force guessing infeasible
//! - Randomness comes from the thread-local CSPRNG
//! - Encoding is base64url without padding, so secrets are unambiguous
//!   printable strings that survive copy/paste and URLs
//!
//! # Format
//!
//! - API tokens: `api_{43 base64url characters}` (47 characters total)
//! - Share tokens: `shr_{43 base64url characters}` (47 characters total)
//!
//! The distinct prefixes identify a leaked secret's kind at a glance and
//! make the two uniqueness namespaces disjoint by construction; each store
//! table additionally enforces uniqueness with a hard constraint.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Prefix carried by API token secrets.
pub const API_SECRET_PREFIX: &str = "api_";

/// Prefix carried by share token secrets.
pub const SHARE_SECRET_PREFIX: &str = "shr_";

/// Generate a new API token secret.
///
/// # Example
///
/// ```
/// use coscribe_tokens::secret::generate_api_secret;
///
/// let secret = generate_api_secret();
/// assert!(secret.starts_with("api_"));
/// assert_eq!(secret.len(), 47);
/// ```
#[must_use]
pub fn generate_api_secret() -> String {
    format!("{API_SECRET_PREFIX}{}", random_part())
}

/// Generate a new share token secret.
///
/// # Example
///
/// ```
/// use coscribe_tokens::secret::generate_share_secret;
///
/// let secret = generate_share_secret();
/// assert!(secret.starts_with("shr_"));
/// assert_eq!(secret.len(), 47);
/// ```
#[must_use]
pub fn generate_share_secret() -> String {
    format!("{SHARE_SECRET_PREFIX}{}", random_part())
}

/// 256-bit random value encoded as base64url (43 characters).
fn random_part() -> String {
    let mut bytes = [0u8; 32];
    rand::Rng::fill(&mut rand::thread_rng(), &mut bytes[..]);
    URL_SAFE_NO_PAD.encode(bytes)
}
