//! Token subsystem configuration.

use serde::{Deserialize, Serialize};

/// Configuration for token issuance.
///
/// # Example (TOML)
///
/// ```toml
/// [tokens]
/// max_issue_attempts = 3
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// How many times the issuer regenerates a secret after a uniqueness
    /// conflict before giving up with `IssuanceFailed`.
    ///
    /// Conflicts on 256-bit secrets are astronomically unlikely, so the
    /// default budget is small.
    pub max_issue_attempts: u32,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            max_issue_attempts: 3,
        }
    }
}

impl TokenConfig {
    /// Sets the issuance retry budget.
    #[must_use]
    pub fn with_max_issue_attempts(mut self, attempts: u32) -> Self {
        self.max_issue_attempts = attempts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TokenConfig::default();
        assert_eq!(config.max_issue_attempts, 3);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TokenConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_issue_attempts, 3);

        let config: TokenConfig = serde_json::from_str(r#"{"max_issue_attempts": 5}"#).unwrap();
        assert_eq!(config.max_issue_attempts, 5);
    }
}
