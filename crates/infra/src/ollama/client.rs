//! Ollama generation client
//!
//! One blocking `/api/generate` call per draft, bounded by a hard timeout.
//! Generation calls are never retried; a slow model should fail the
//! in-flight message, not stall the whole batch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use draftpilot_core::{DraftGenerator, ReplyPrompt};
use draftpilot_domain::{GenerationOptions, OllamaConfig, Result as DomainResult};

use crate::http::{HttpClient, HttpError};

/// Failures surfaced by generation calls.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The model did not answer within the configured bound.
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success response from the generation service.
    #[error("generation service error {status}: {message}")]
    Api { status: u16, message: String },

    /// Service unreachable.
    #[error("generation service unreachable: {0}")]
    Network(String),

    /// Response arrived but could not be interpreted.
    #[error("malformed generation payload: {0}")]
    MalformedPayload(String),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: SamplingOptions,
}

/// Sampling knobs in the service's wire names.
#[derive(Debug, Serialize)]
struct SamplingOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    num_predict: u32,
}

impl From<&GenerationOptions> for SamplingOptions {
    fn from(options: &GenerationOptions) -> Self {
        Self {
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            num_predict: options.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
    error: Option<String>,
}

/// Client for a locally hosted Ollama instance.
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    model: String,
    timeout: Duration,
    options: GenerationOptions,
}

impl OllamaClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(config: &OllamaConfig) -> Result<Self, GenerationError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = HttpClient::builder()
            .timeout(timeout)
            .max_attempts(1)
            .build()
            .map_err(|err| GenerationError::Network(err.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout,
            options: config.options.clone(),
        })
    }

    /// One non-streaming generation call.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let payload = GenerateRequest {
            model: &self.model,
            prompt: prompt.to_string(),
            stream: false,
            options: SamplingOptions::from(&self.options),
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "requesting generation");

        let request = self.http.request(Method::POST, &url).json(&payload);
        let response = self.http.send(request).await.map_err(|err| match err {
            HttpError::Timeout(_) => GenerationError::Timeout(self.timeout),
            HttpError::Transport(msg) | HttpError::InvalidRequest(msg) => {
                GenerationError::Network(msg)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "generation service returned an error");
            return Err(GenerationError::Api { status: status.as_u16(), message });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::MalformedPayload(err.to_string()))?;

        match (payload.response, payload.error) {
            (Some(text), _) => Ok(text),
            (None, Some(error)) => Err(GenerationError::Api { status: status.as_u16(), message: error }),
            (None, None) => {
                Err(GenerationError::MalformedPayload("response field missing".into()))
            }
        }
    }
}

#[async_trait]
impl DraftGenerator for OllamaClient {
    async fn generate(&self, prompt: &ReplyPrompt) -> DomainResult<String> {
        Ok(self.generate_text(&prompt.render()).await?)
    }
}
