//! Microsoft Graph integration

mod gateway;
mod types;

pub use gateway::{GatewayError, GraphGateway};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use draftpilot_core::MailboxGateway;
use draftpilot_domain::{BusyInterval, EmailDetail, EmailSummary, OutgoingDraft, Result};

#[async_trait]
impl MailboxGateway for GraphGateway {
    async fn list_unread(&self, top: u32) -> Result<Vec<EmailSummary>> {
        Ok(GraphGateway::list_unread(self, top).await?)
    }

    async fn fetch_message(&self, message_id: &str) -> Result<EmailDetail> {
        Ok(GraphGateway::fetch_message(self, message_id).await?)
    }

    async fn busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>> {
        Ok(GraphGateway::busy_intervals(self, start, end).await?)
    }

    async fn create_draft(&self, draft: &OutgoingDraft) -> Result<String> {
        Ok(GraphGateway::create_draft(self, draft).await?)
    }

    async fn create_reply_draft(&self, message_id: &str, body_html: &str) -> Result<String> {
        Ok(GraphGateway::create_reply_draft(self, message_id, body_html).await?)
    }

    async fn mark_read(&self, message_id: &str) -> Result<()> {
        Ok(GraphGateway::mark_read(self, message_id).await?)
    }
}
