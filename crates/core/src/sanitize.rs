//! Generated-text sanitizer
//!
//! Strips a known class of formatting artifacts from raw model output before
//! it is used as an email body. The cleanup is an ordered list of pure
//! passes (signature strip, then fence strip, then greeting dedup) and the
//! pass ordering is part of the contract.

use once_cell::sync::Lazy;
use regex::Regex;

static SIGNATURE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^-{2,}").unwrap());

static OPEN_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z]*[ \t]*\n?").unwrap());

static CLOSE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n?```\s*$").unwrap());

/// Locale-specific sanitizer settings.
///
/// The default greeting set mirrors common English openers; deployments in
/// other locales supply their own prefixes.
#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    /// Lowercase line prefixes treated as greetings
    pub greeting_prefixes: Vec<String>,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self {
            greeting_prefixes: [
                "dear",
                "hello",
                "hi",
                "greetings",
                "good morning",
                "good afternoon",
                "good evening",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}

impl SanitizePolicy {
    /// Prefix match against the greeting set, case-insensitive.
    fn is_greeting(&self, line: &str) -> bool {
        let lowered = line.to_lowercase();
        self.greeting_prefixes.iter().any(|prefix| lowered.starts_with(prefix))
    }
}

/// Clean raw model output with the default policy.
///
/// Deterministic and free of I/O; already-clean text is a fixpoint, so
/// `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(text: &str) -> String {
    sanitize_with(text, &SanitizePolicy::default())
}

/// Clean raw model output: signature strip, fence strip, greeting dedup.
pub fn sanitize_with(text: &str, policy: &SanitizePolicy) -> String {
    let text = strip_signature_block(text);
    let text = strip_code_fences(&text);
    dedup_greetings(&text, policy)
}

/// Drop everything from the first line beginning with two or more dashes
/// (dash-delimited signature convention) through the end of the text.
pub fn strip_signature_block(text: &str) -> String {
    match SIGNATURE_LINE.find(text) {
        Some(found) => text[..found.start()].trim_end().to_string(),
        None => text.to_string(),
    }
}

/// Remove a leading code-fence marker (optionally tagged, e.g. ```` ```email ````)
/// and a trailing closing fence, leaving interior content untouched.
pub fn strip_code_fences(text: &str) -> String {
    let without_open = OPEN_FENCE.replace(text, "");
    CLOSE_FENCE.replace(&without_open, "").into_owned()
}

/// Keep only the first greeting line; later lines matching a greeting prefix
/// are dropped entirely. All other lines keep their order.
pub fn dedup_greetings(text: &str, policy: &SanitizePolicy) -> String {
    let mut seen_greeting = false;
    let mut kept = Vec::new();

    for line in text.split('\n') {
        if policy.is_greeting(line) {
            if seen_greeting {
                continue;
            }
            seen_greeting = true;
        }
        kept.push(line);
    }

    kept.join("\n")
}
