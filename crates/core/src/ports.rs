//! Port interfaces implemented by the infrastructure layer

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use draftpilot_domain::{BusyInterval, EmailDetail, EmailSummary, OutgoingDraft, Result};

use crate::prompt::ReplyPrompt;

/// Operations the orchestration layer needs from the mailbox/calendar
/// provider. Implemented by the authenticated Graph gateway.
#[async_trait]
pub trait MailboxGateway: Send + Sync {
    /// List unread inbox messages, newest first.
    async fn list_unread(&self, top: u32) -> Result<Vec<EmailSummary>>;

    /// Fetch a single message by id, including its full body.
    async fn fetch_message(&self, message_id: &str) -> Result<EmailDetail>;

    /// Calendar events in `[start, end)` as busy intervals, ordered by
    /// provider start time.
    async fn busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>>;

    /// Create a new draft message; returns the provider id of the draft.
    async fn create_draft(&self, draft: &OutgoingDraft) -> Result<String>;

    /// Create a reply draft to an existing message and set its body; returns
    /// the provider id of the draft.
    async fn create_reply_draft(&self, message_id: &str, body_html: &str) -> Result<String>;

    /// Mark a message as read.
    async fn mark_read(&self, message_id: &str) -> Result<()>;
}

/// Text-generation service boundary. May be slow or fail; implementations
/// must enforce a bounded timeout and surface it distinguishably.
#[async_trait]
pub trait DraftGenerator: Send + Sync {
    /// Generate raw (unsanitized) reply text for the prompt.
    async fn generate(&self, prompt: &ReplyPrompt) -> Result<String>;
}
