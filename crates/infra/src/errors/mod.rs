//! Conversions from infrastructure error types into the application error.
//!
//! Each integration keeps its own precise error enum; callers above the port
//! boundary see [`DraftPilotError`]. The mapping preserves the distinction
//! that matters upstream: auth failures, not-found, timeouts and transport
//! problems each land in their own variant.

use draftpilot_domain::DraftPilotError;

use crate::auth::CredentialError;
use crate::graph::GatewayError;
use crate::http::HttpError;
use crate::ollama::GenerationError;

impl From<CredentialError> for DraftPilotError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Network(msg) => DraftPilotError::Network(msg),
            other => DraftPilotError::Auth(other.to_string()),
        }
    }
}

impl From<GatewayError> for DraftPilotError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::ExternalCredentialExpired | GatewayError::Unauthorized => {
                DraftPilotError::Auth(err.to_string())
            }
            GatewayError::Api { status: 404, message } => DraftPilotError::NotFound(message),
            GatewayError::Api { .. }
            | GatewayError::MalformedPayload(_)
            | GatewayError::InvalidRequest(_) => DraftPilotError::Internal(err.to_string()),
            GatewayError::Network(msg) => DraftPilotError::Network(msg),
            GatewayError::Credential(inner) => inner.into(),
        }
    }
}

impl From<GenerationError> for DraftPilotError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Network(msg) => DraftPilotError::Network(msg),
            other => DraftPilotError::Generation(other.to_string()),
        }
    }
}

impl From<HttpError> for DraftPilotError {
    fn from(err: HttpError) -> Self {
        DraftPilotError::Network(err.to_string())
    }
}
