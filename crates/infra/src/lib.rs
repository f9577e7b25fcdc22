//! # Draftpilot Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP client plumbing (timeouts, bounded retry)
//! - Bearer credential management (client-credential grant)
//! - The authenticated Graph gateway
//! - The Ollama generation client
//! - Configuration loading and error conversions
//!
//! ## Architecture
//! - Implements traits defined in `draftpilot-core`
//! - Depends on `draftpilot-domain` and `draftpilot-core`
//! - Contains all "impure" code (network I/O, environment access)

pub mod auth;
pub mod config;
pub mod errors;
pub mod graph;
pub mod http;
pub mod ollama;

// Re-export commonly used items
pub use auth::{CredentialError, CredentialStore, TokenSet};
pub use graph::{GatewayError, GraphGateway};
pub use http::{HttpClient, HttpError};
pub use ollama::{GenerationError, OllamaClient};
