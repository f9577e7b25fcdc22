//! Batch orchestration over the mailbox and generation ports
//!
//! The assistant owns the per-message pipeline: fetch, compute availability,
//! prompt, generate, sanitize, persist the draft, mark read. A failure on
//! one message is logged and skipped; the batch keeps going.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use draftpilot_core::prompt::{render_availability, ReplyPrompt};
use draftpilot_core::{find_available_slots, sanitize_with, DraftGenerator, MailboxGateway, SanitizePolicy};
use draftpilot_domain::{AvailableSlot, EmailSummary, Result, SchedulingConfig};

/// Number of slots offered to the model per reply.
const SLOTS_PER_REPLY: usize = 3;

/// Outcome counts for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub drafted: usize,
    pub failed: usize,
}

pub struct Assistant {
    mailbox: Arc<dyn MailboxGateway>,
    generator: Arc<dyn DraftGenerator>,
    scheduling: SchedulingConfig,
    sanitize_policy: SanitizePolicy,
}

impl Assistant {
    pub fn new(
        mailbox: Arc<dyn MailboxGateway>,
        generator: Arc<dyn DraftGenerator>,
        scheduling: SchedulingConfig,
    ) -> Self {
        Self { mailbox, generator, scheduling, sanitize_policy: SanitizePolicy::default() }
    }

    /// List unread messages without drafting anything.
    pub async fn unread(&self, top: u32) -> Result<Vec<EmailSummary>> {
        self.mailbox.list_unread(top).await
    }

    /// Compute availability over the configured horizon starting now.
    pub async fn available_slots(&self) -> Result<Vec<AvailableSlot>> {
        let now = Utc::now();
        let horizon = now + Duration::days(i64::from(self.scheduling.days_ahead) + 1);
        let busy = self.mailbox.busy_intervals(now, horizon).await?;

        Ok(find_available_slots(
            &busy,
            now,
            self.scheduling.days_ahead,
            self.scheduling.min_duration_minutes,
            &self.scheduling.working_window,
            &self.scheduling.weekend,
        ))
    }

    /// Draft a reply for one message and persist it; returns the draft id.
    ///
    /// With `dry_run` the pipeline stops after sanitization: nothing is
    /// written to the mailbox and the message stays unread.
    pub async fn draft_reply(&self, message_id: &str, dry_run: bool) -> Result<Option<String>> {
        let message = self.mailbox.fetch_message(message_id).await?;
        let slots = self.available_slots().await?;
        let availability = render_availability(
            &slots,
            SLOTS_PER_REPLY,
            self.scheduling.working_window.timezone(),
        );

        let prompt = ReplyPrompt::for_reply(&message, &availability);
        let raw = self.generator.generate(&prompt).await?;
        let cleaned = sanitize_with(&raw, &self.sanitize_policy);
        let body_html = cleaned.replace('\n', "<br>");

        if dry_run {
            info!(message_id, chars = cleaned.len(), "dry run, draft not persisted");
            return Ok(None);
        }

        let draft_id = self.mailbox.create_reply_draft(message_id, &body_html).await?;
        self.mailbox.mark_read(message_id).await?;
        info!(message_id, draft_id, "reply draft created");

        Ok(Some(draft_id))
    }

    /// Draft replies for up to `limit` unread messages.
    ///
    /// Failures are per-message: a message that cannot be drafted is logged
    /// and counted, and the batch continues with the next one.
    pub async fn process_unread(&self, limit: u32, dry_run: bool) -> Result<BatchOutcome> {
        let unread = self.mailbox.list_unread(limit).await?;
        info!(count = unread.len(), dry_run, "processing unread messages");

        let mut outcome = BatchOutcome::default();
        for summary in unread {
            match self.draft_reply(&summary.id, dry_run).await {
                Ok(_) => outcome.drafted += 1,
                Err(err) => {
                    warn!(
                        message_id = %summary.id,
                        subject = %summary.subject,
                        error = %err,
                        "skipping message"
                    );
                    outcome.failed += 1;
                }
            }
        }

        Ok(outcome)
    }
}
