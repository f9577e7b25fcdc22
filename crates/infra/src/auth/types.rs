//! Bearer token types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An opaque bearer token with its (estimated or provider-confirmed) expiry.
///
/// Client-credential grants issue no refresh token; a new token is acquired
/// from scratch on renewal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Opaque access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer" for OAuth 2.0)
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Absolute expiration timestamp (UTC), calculated from `expires_in` at
    /// creation time. `None` means the expiry is unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenSet {
    /// Create a `TokenSet` with a calculated expiration time.
    #[must_use]
    pub fn new(access_token: String, expires_in: i64) -> Self {
        let expires_at = if expires_in > 0 {
            Some(Utc::now() + chrono::Duration::seconds(expires_in))
        } else {
            None
        };

        Self { access_token, token_type: "Bearer".to_string(), expires_in, expires_at }
    }

    /// Token with no known expiry, e.g. one supplied by an external caller.
    #[must_use]
    pub fn without_expiry(access_token: String) -> Self {
        Self { access_token, token_type: "Bearer".to_string(), expires_in: 0, expires_at: None }
    }

    /// Whether the token is expired or will expire within the threshold.
    ///
    /// Tokens without a known expiry are assumed valid.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                Utc::now() + chrono::Duration::seconds(threshold_seconds) >= expires_at
            }
            None => false,
        }
    }

    /// Seconds until expiry, or `None` when no expiry is known.
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_not_expired() {
        let token = TokenSet::new("abc".to_string(), 3600);
        assert!(!token.is_expired(300));
        assert!(token.seconds_until_expiry().unwrap() > 3000);
    }

    #[test]
    fn token_inside_threshold_counts_as_expired() {
        let token = TokenSet::new("abc".to_string(), 60);
        assert!(token.is_expired(300));
    }

    #[test]
    fn token_without_expiry_never_expires() {
        let token = TokenSet::without_expiry("abc".to_string());
        assert!(!token.is_expired(300));
        assert_eq!(token.seconds_until_expiry(), None);
    }
}
