//! Process-wide credential store
//!
//! Holds the bearer credential behind a single write path. A store either
//! owns its credential (client-credential grant, renewable) or wraps an
//! externally supplied token, which is never renewed here.

use reqwest::Method;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info};

use draftpilot_domain::constants::{AUTHORITY_BASE, GRAPH_DEFAULT_SCOPE, TOKEN_REFRESH_THRESHOLD_SECS};
use draftpilot_domain::GraphConfig;

use super::types::TokenSet;
use crate::http::{HttpClient, HttpError};

/// Error type for credential operations
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The auth provider did not return a usable token
    #[error("credential renewal failed: {0}")]
    RenewalFailed(String),

    /// Token endpoint was unreachable
    #[error("token endpoint unreachable: {0}")]
    Network(String),

    /// Renewal was requested for a credential this process does not own
    #[error("credential is externally supplied and cannot be renewed here")]
    ExternallyOwned,
}

/// Client identity used for the client-credential grant
#[derive(Debug, Clone)]
struct ClientIdentity {
    client_id: String,
    client_secret: String,
}

/// Wire format of the token endpoint response. Both the success and the
/// error shape land here; absence of `access_token` is a fatal renewal
/// failure.
#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Single-owner handle to the process-wide bearer credential.
///
/// Only this type mutates the credential; renewal is serialized behind the
/// write lock so concurrent callers never race conflicting grants, and they
/// observe the replaced value on their next call.
pub struct CredentialStore {
    /// `None` when the token was supplied externally
    identity: Option<ClientIdentity>,
    http: Option<HttpClient>,
    token_url: String,
    scope: String,
    current: RwLock<Option<TokenSet>>,
}

impl CredentialStore {
    /// Store that owns its credential and renews it via the provider's
    /// client-credential grant.
    pub fn client_credentials(config: &GraphConfig, http: HttpClient) -> Self {
        Self {
            identity: Some(ClientIdentity {
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
            }),
            http: Some(http),
            token_url: format!("{AUTHORITY_BASE}/{}/oauth2/v2.0/token", config.tenant_id),
            scope: GRAPH_DEFAULT_SCOPE.to_string(),
            current: RwLock::new(None),
        }
    }

    /// Store wrapping a token owned by the caller. It is used as-is and
    /// never renewed; expiry is surfaced to the caller instead.
    pub fn external(token: impl Into<String>) -> Self {
        Self {
            identity: None,
            http: None,
            token_url: String::new(),
            scope: String::new(),
            current: RwLock::new(Some(TokenSet::without_expiry(token.into()))),
        }
    }

    /// Point the store at a different token endpoint (sovereign clouds,
    /// mock servers in tests).
    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Whether this process owns the credential lifecycle.
    pub fn is_owned(&self) -> bool {
        self.identity.is_some()
    }

    /// Current bearer token, acquiring or renewing when necessary.
    ///
    /// # Errors
    /// Returns `CredentialError::RenewalFailed`/`Network` when the grant
    /// fails. An externally supplied token is returned without any validity
    /// check.
    pub async fn bearer_token(&self) -> Result<String, CredentialError> {
        {
            let current = self.current.read().await;
            if let Some(token) = current.as_ref() {
                if !self.is_owned() || !token.is_expired(TOKEN_REFRESH_THRESHOLD_SECS) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        self.renew().await?;

        let current = self.current.read().await;
        current
            .as_ref()
            .map(|token| token.access_token.clone())
            .ok_or_else(|| CredentialError::RenewalFailed("no token after renewal".into()))
    }

    /// Exchange the client identity for a fresh token, replacing the stored
    /// credential.
    ///
    /// # Errors
    /// Fails immediately with `ExternallyOwned` for caller-supplied tokens;
    /// a failed grant is fatal for the in-flight operation and is never
    /// retried here.
    pub async fn renew(&self) -> Result<(), CredentialError> {
        let (identity, http) = match (&self.identity, &self.http) {
            (Some(identity), Some(http)) => (identity, http),
            _ => return Err(CredentialError::ExternallyOwned),
        };

        // Write lock held across the exchange: concurrent renewals serialize
        // and later ones overwrite with an equally fresh token.
        let mut current = self.current.write().await;

        let request = http.request(Method::POST, &self.token_url).form(&[
            ("client_id", identity.client_id.as_str()),
            ("client_secret", identity.client_secret.as_str()),
            ("scope", self.scope.as_str()),
            ("grant_type", "client_credentials"),
        ]);

        let response = http.send(request).await.map_err(|err| match err {
            HttpError::Timeout(msg) | HttpError::Transport(msg) => CredentialError::Network(msg),
            HttpError::InvalidRequest(msg) => CredentialError::RenewalFailed(msg),
        })?;

        let status = response.status();
        let payload: TokenEndpointResponse = response.json().await.map_err(|err| {
            CredentialError::RenewalFailed(format!("unreadable token response: {err}"))
        })?;

        match payload.access_token {
            Some(access_token) => {
                let expires_in = payload.expires_in.unwrap_or(3600);
                *current = Some(TokenSet::new(access_token, expires_in));
                info!("bearer credential renewed");
                Ok(())
            }
            None => {
                let description = payload
                    .error_description
                    .or(payload.error)
                    .unwrap_or_else(|| format!("token response missing access_token ({status})"));
                error!(%status, "credential renewal failed");
                Err(CredentialError::RenewalFailed(description))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn graph_config() -> GraphConfig {
        GraphConfig {
            tenant_id: "tenant-1".to_string(),
            client_id: "client-1".to_string(),
            client_secret: "secret-1".to_string(),
            mailbox: "team@example.com".to_string(),
        }
    }

    fn http() -> HttpClient {
        HttpClient::builder()
            .timeout(Duration::from_secs(2))
            .max_attempts(1)
            .build()
            .expect("http client")
    }

    #[tokio::test]
    async fn acquires_token_via_client_credential_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=client-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "access_token": "fresh-token"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = CredentialStore::client_credentials(&graph_config(), http())
            .with_token_url(format!("{}/token", server.uri()));

        assert!(store.is_owned());
        assert_eq!(store.bearer_token().await.unwrap(), "fresh-token");
        // Second call reuses the cached token; the mock expects one hit.
        assert_eq!(store.bearer_token().await.unwrap(), "fresh-token");
    }

    #[tokio::test]
    async fn missing_access_token_is_a_renewal_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "invalid_client",
                "error_description": "AADSTS7000215: invalid client secret"
            })))
            .mount(&server)
            .await;

        let store = CredentialStore::client_credentials(&graph_config(), http())
            .with_token_url(format!("{}/token", server.uri()));

        let result = store.bearer_token().await;
        match result {
            Err(CredentialError::RenewalFailed(msg)) => assert!(msg.contains("AADSTS7000215")),
            other => panic!("expected renewal failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn external_store_returns_token_but_never_renews() {
        let store = CredentialStore::external("caller-token");

        assert!(!store.is_owned());
        assert_eq!(store.bearer_token().await.unwrap(), "caller-token");
        assert!(matches!(store.renew().await, Err(CredentialError::ExternallyOwned)));
    }

    #[tokio::test]
    async fn forced_renewal_replaces_the_stored_token() {
        let server = MockServer::start().await;
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter_clone = counter.clone();
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                let n = counter_clone.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "token_type": "Bearer",
                    "expires_in": 3599,
                    "access_token": format!("token-{n}")
                }))
            })
            .mount(&server)
            .await;

        let store = CredentialStore::client_credentials(&graph_config(), http())
            .with_token_url(format!("{}/token", server.uri()));

        assert_eq!(store.bearer_token().await.unwrap(), "token-0");
        store.renew().await.unwrap();
        assert_eq!(store.bearer_token().await.unwrap(), "token-1");
    }
}
