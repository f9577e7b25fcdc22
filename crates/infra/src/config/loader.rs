//! Environment variable configuration loader
//!
//! All knobs come from `DRAFTPILOT_*` variables. The Graph credentials and
//! mailbox are required; everything else falls back to defaults. A `.env`
//! file, when present, is loaded by the binary before this runs.

use std::env;
use std::str::FromStr;

use chrono::Weekday;
use chrono_tz::Tz;
use tracing::debug;

use draftpilot_domain::constants::{
    DEFAULT_DAYS_AHEAD, DEFAULT_MIN_SLOT_MINUTES, DEFAULT_UNREAD_PAGE_SIZE,
    DEFAULT_WORKING_END_HOUR, DEFAULT_WORKING_START_HOUR,
};
use draftpilot_domain::{
    DraftPilotError, GraphConfig, OllamaConfig, Result, SchedulingConfig, WorkingWindow,
};

/// Fully loaded application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub graph: GraphConfig,
    pub ollama: OllamaConfig,
    pub scheduling: SchedulingConfig,
    /// Page size for unread listings
    pub unread_page_size: u32,
}

/// Load configuration from the process environment.
///
/// # Errors
/// Returns `DraftPilotError::Config` when a required variable is missing or
/// a value fails to parse.
pub fn load() -> Result<AppConfig> {
    let graph = GraphConfig {
        tenant_id: required("DRAFTPILOT_TENANT_ID")?,
        client_id: required("DRAFTPILOT_CLIENT_ID")?,
        client_secret: required("DRAFTPILOT_CLIENT_SECRET")?,
        mailbox: required("DRAFTPILOT_MAILBOX")?,
    };

    let mut ollama = OllamaConfig::default();
    if let Some(url) = optional("DRAFTPILOT_OLLAMA_URL") {
        ollama.base_url = url;
    }
    if let Some(model) = optional("DRAFTPILOT_OLLAMA_MODEL") {
        ollama.model = model;
    }
    if let Some(timeout) = optional("DRAFTPILOT_OLLAMA_TIMEOUT_SECS") {
        ollama.timeout_secs = parse("DRAFTPILOT_OLLAMA_TIMEOUT_SECS", &timeout)?;
    }

    let timezone: Tz = match optional("DRAFTPILOT_TIMEZONE") {
        Some(name) => name
            .parse()
            .map_err(|_| DraftPilotError::Config(format!("unknown timezone: {name}")))?,
        None => chrono_tz::UTC,
    };

    let start_hour = parse_or(
        "DRAFTPILOT_WORKING_START_HOUR",
        DEFAULT_WORKING_START_HOUR,
    )?;
    let end_hour = parse_or("DRAFTPILOT_WORKING_END_HOUR", DEFAULT_WORKING_END_HOUR)?;
    let working_window = WorkingWindow::new(start_hour, end_hour, timezone)
        .map_err(|err| DraftPilotError::Config(err.to_string()))?;

    let mut scheduling = SchedulingConfig::with_window(working_window);
    scheduling.days_ahead = parse_or("DRAFTPILOT_DAYS_AHEAD", DEFAULT_DAYS_AHEAD)?;
    scheduling.min_duration_minutes =
        parse_or("DRAFTPILOT_MIN_SLOT_MINUTES", DEFAULT_MIN_SLOT_MINUTES)?;
    if let Some(raw) = optional("DRAFTPILOT_WEEKEND") {
        scheduling.weekend = parse_weekend(&raw)?;
    }

    let unread_page_size = parse_or("DRAFTPILOT_UNREAD_PAGE_SIZE", DEFAULT_UNREAD_PAGE_SIZE)?;

    debug!(
        mailbox = %graph.mailbox,
        model = %ollama.model,
        timezone = %timezone,
        "configuration loaded"
    );

    Ok(AppConfig { graph, ollama, scheduling, unread_page_size })
}

fn required(name: &str) -> Result<String> {
    optional(name)
        .ok_or_else(|| DraftPilotError::Config(format!("missing required variable {name}")))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn parse<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| DraftPilotError::Config(format!("invalid value for {name}: {raw}")))
}

fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match optional(name) {
        Some(raw) => parse(name, &raw),
        None => Ok(default),
    }
}

/// Parse a comma-separated weekend list like `sat,sun` or `fri,sat`.
///
/// An explicitly empty list (`DRAFTPILOT_WEEKEND=none`) disables the skip
/// entirely.
fn parse_weekend(raw: &str) -> Result<Vec<Weekday>> {
    if raw.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<Weekday>()
                .map_err(|_| DraftPilotError::Config(format!("invalid weekend day: {token}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_all() {
        for (name, _) in env::vars() {
            if name.starts_with("DRAFTPILOT_") {
                env::remove_var(name);
            }
        }
    }

    fn set_required() {
        env::set_var("DRAFTPILOT_TENANT_ID", "tenant-1");
        env::set_var("DRAFTPILOT_CLIENT_ID", "client-1");
        env::set_var("DRAFTPILOT_CLIENT_SECRET", "secret-1");
        env::set_var("DRAFTPILOT_MAILBOX", "team@example.com");
    }

    // Environment mutation is process-global, so all loader scenarios run in
    // one sequential test.
    #[test]
    fn loader_scenarios() {
        clear_all();

        // Missing required variables fail with a Config error naming them.
        match load() {
            Err(DraftPilotError::Config(msg)) => assert!(msg.contains("DRAFTPILOT_TENANT_ID")),
            other => panic!("expected config error, got {other:?}"),
        }

        // Minimal environment gets defaults everywhere else.
        set_required();
        let config = load().unwrap();
        assert_eq!(config.graph.mailbox, "team@example.com");
        assert_eq!(config.ollama.model, "llama3.1:8b");
        assert_eq!(config.scheduling.days_ahead, 7);
        assert_eq!(config.scheduling.working_window.start_hour(), 9);
        assert_eq!(config.scheduling.working_window.timezone(), chrono_tz::UTC);
        assert_eq!(config.scheduling.weekend, vec![Weekday::Sat, Weekday::Sun]);

        // Overrides are honored.
        env::set_var("DRAFTPILOT_TIMEZONE", "Europe/Berlin");
        env::set_var("DRAFTPILOT_WORKING_START_HOUR", "8");
        env::set_var("DRAFTPILOT_WORKING_END_HOUR", "16");
        env::set_var("DRAFTPILOT_WEEKEND", "fri,sat");
        env::set_var("DRAFTPILOT_DAYS_AHEAD", "14");
        let config = load().unwrap();
        assert_eq!(config.scheduling.working_window.timezone(), chrono_tz::Europe::Berlin);
        assert_eq!(config.scheduling.working_window.end_hour(), 16);
        assert_eq!(config.scheduling.weekend, vec![Weekday::Fri, Weekday::Sat]);
        assert_eq!(config.scheduling.days_ahead, 14);

        // `none` disables the weekend skip.
        env::set_var("DRAFTPILOT_WEEKEND", "none");
        assert!(load().unwrap().scheduling.weekend.is_empty());

        // Garbage values are rejected, not silently defaulted.
        env::set_var("DRAFTPILOT_WEEKEND", "caturday");
        assert!(matches!(load(), Err(DraftPilotError::Config(_))));
        env::remove_var("DRAFTPILOT_WEEKEND");

        env::set_var("DRAFTPILOT_TIMEZONE", "Mars/Olympus_Mons");
        assert!(matches!(load(), Err(DraftPilotError::Config(_))));
        env::remove_var("DRAFTPILOT_TIMEZONE");

        // An inverted working window is a config error.
        env::set_var("DRAFTPILOT_WORKING_START_HOUR", "18");
        env::set_var("DRAFTPILOT_WORKING_END_HOUR", "9");
        assert!(matches!(load(), Err(DraftPilotError::Config(_))));

        clear_all();
    }
}
