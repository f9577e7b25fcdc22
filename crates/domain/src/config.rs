//! Configuration structures
//!
//! Plain data carried from the environment into the infrastructure layer.
//! Loading and validation live in `draftpilot-infra::config`.

use chrono::Weekday;

use crate::constants::{
    DEFAULT_DAYS_AHEAD, DEFAULT_GENERATION_TIMEOUT_SECS, DEFAULT_MIN_SLOT_MINUTES,
    DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL,
};
use crate::types::WorkingWindow;

/// Microsoft Graph connection settings
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Azure AD tenant id used for the client-credential grant
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    /// Mailbox to operate on (app-only tokens cannot use `/me`)
    pub mailbox: String,
}

/// Generation service settings
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    /// Hard bound on a single generation call
    pub timeout_secs: u64,
    pub options: GenerationOptions,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
            options: GenerationOptions::default(),
        }
    }
}

/// Model sampling options passed through to the generation service
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self { temperature: 0.6, top_p: 0.9, top_k: 40, max_tokens: 1024 }
    }
}

/// Availability computation policy
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    pub days_ahead: u32,
    pub min_duration_minutes: i64,
    pub working_window: WorkingWindow,
    /// Days skipped entirely when computing availability
    pub weekend: Vec<Weekday>,
}

impl SchedulingConfig {
    /// Policy with default horizon, slot length, and Saturday/Sunday weekend.
    pub fn with_window(working_window: WorkingWindow) -> Self {
        Self {
            days_ahead: DEFAULT_DAYS_AHEAD,
            min_duration_minutes: DEFAULT_MIN_SLOT_MINUTES,
            working_window,
            weekend: vec![Weekday::Sat, Weekday::Sun],
        }
    }
}
