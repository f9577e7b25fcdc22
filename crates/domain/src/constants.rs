//! Domain constants shared across crates

/// Microsoft Graph API base URL
pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Authority base for the client-credential token grant
pub const AUTHORITY_BASE: &str = "https://login.microsoftonline.com";

/// Default scope requested for app-only Graph tokens
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Default generation endpoint of a local Ollama instance
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default generation model
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";

/// Generation requests are abandoned after this many seconds
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 15;

/// Default working-hours boundaries (local time, whole hours)
pub const DEFAULT_WORKING_START_HOUR: u32 = 9;
pub const DEFAULT_WORKING_END_HOUR: u32 = 17;

/// Default availability horizon in calendar days
pub const DEFAULT_DAYS_AHEAD: u32 = 7;

/// Default minimum usable slot length in minutes
pub const DEFAULT_MIN_SLOT_MINUTES: i64 = 30;

/// Unread messages fetched per processing cycle
pub const DEFAULT_UNREAD_PAGE_SIZE: u32 = 25;

/// Renew bearer tokens this many seconds before their expiry
pub const TOKEN_REFRESH_THRESHOLD_SECS: i64 = 300;
