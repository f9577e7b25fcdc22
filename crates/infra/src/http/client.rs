use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use thiserror::Error;
use tracing::debug;

/// Transport-level failure of an HTTP call.
///
/// Timeouts get their own variant so callers can surface a bounded-timeout
/// failure distinguishably (the generation client relies on this).
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// HTTP client with a hard per-request timeout and bounded retry of
/// transient failures (transport errors and 5xx responses).
///
/// Protocol-level retry decisions, like the gateway's single 401 renewal
/// retry, live above this layer and keep their own counters.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute a prepared request, retrying transport failures and server
    /// errors with exponential backoff until the attempt budget runs out.
    ///
    /// Non-5xx status codes are returned to the caller as-is; what counts as
    /// an application error is the caller's decision.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, HttpError> {
        let attempts = self.max_attempts.max(1);
        let mut last_error: Option<HttpError> = None;

        for attempt in 1..=attempts {
            let prepared = builder
                .try_clone()
                .ok_or_else(|| {
                    HttpError::InvalidRequest(
                        "request body cannot be cloned; buffer the body to enable retries".into(),
                    )
                })?
                .build()
                .map_err(|err| HttpError::InvalidRequest(err.to_string()))?;

            let method = prepared.method().clone();
            let url = prepared.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            match self.client.execute(prepared).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if status.is_server_error() && attempt < attempts {
                        self.backoff(attempt).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");

                    let mapped = if err.is_timeout() {
                        HttpError::Timeout(err.to_string())
                    } else {
                        HttpError::Transport(err.to_string())
                    };

                    if attempt < attempts {
                        last_error = Some(mapped);
                        self.backoff(attempt).await;
                        continue;
                    }
                    return Err(mapped);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| HttpError::Transport("attempt budget exhausted".into())))
    }

    async fn backoff(&self, completed_attempts: usize) {
        let shift = completed_attempts.saturating_sub(1).min(8) as u32;
        let delay = self.base_backoff.saturating_mul(1 << shift);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Hard bound on a single request, connect through body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, HttpError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client =
            builder.build().map_err(|err| HttpError::InvalidRequest(err.to_string()))?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}
