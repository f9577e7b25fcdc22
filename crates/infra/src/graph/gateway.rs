//! Authenticated Microsoft Graph gateway
//!
//! Every call goes through [`GraphGateway::call`], which injects the bearer
//! credential and owns the single-renewal retry on 401. Operations above it
//! are thin typed wrappers over the provider endpoints.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

use draftpilot_domain::constants::GRAPH_API_BASE;
use draftpilot_domain::{BusyInterval, EmailDetail, EmailSummary, OutgoingDraft};

use super::types::{
    GraphCreated, GraphErrorBody, GraphEvent, GraphList, GraphMessage, GraphMessageDetail,
    OutgoingBody,
};
use crate::auth::{CredentialError, CredentialStore};
use crate::http::{HttpClient, HttpError};

/// Failures surfaced by gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A caller-supplied credential was rejected; this process cannot renew
    /// it, the caller has to supply a fresh one.
    #[error("externally supplied credential was rejected by the API")]
    ExternalCredentialExpired,

    /// The API rejected the request even after a credential renewal.
    #[error("request remained unauthorized after credential renewal")]
    Unauthorized,

    /// Non-success response from the API.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport failure before any response arrived.
    #[error("network failure: {0}")]
    Network(String),

    /// Response arrived but could not be interpreted.
    #[error("malformed API payload: {0}")]
    MalformedPayload(String),

    /// The request could not be constructed locally; no network traffic
    /// happened.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Authenticated HTTP facade over the Microsoft Graph API.
///
/// Holds the credential store and the mailbox it operates on. App-only
/// tokens have no notion of `/me`, so every path is rooted at
/// `users/{mailbox}`.
pub struct GraphGateway {
    http: HttpClient,
    credentials: Arc<CredentialStore>,
    base_url: String,
    mailbox: String,
}

impl GraphGateway {
    pub fn new(http: HttpClient, credentials: Arc<CredentialStore>, mailbox: impl Into<String>) -> Self {
        Self {
            http,
            credentials,
            base_url: GRAPH_API_BASE.to_string(),
            mailbox: mailbox.into(),
        }
    }

    /// Point the gateway at a different API root (mock servers in tests).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn mailbox_url(&self, suffix: &str) -> String {
        format!("{}/users/{}/{suffix}", self.base_url, self.mailbox)
    }

    /// Execute an API call with bearer injection and at most one credential
    /// renewal.
    ///
    /// A 401 on an owned credential triggers exactly one renewal followed by
    /// one replay; a second 401 is surfaced as [`GatewayError::Unauthorized`].
    /// A 401 on an externally supplied credential is never retried.
    async fn call(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        prefer: Option<&str>,
    ) -> Result<Response, GatewayError> {
        let mut renewals_remaining = 1u8;

        loop {
            let token = self.credentials.bearer_token().await?;

            let mut request =
                self.http.request(method.clone(), url).bearer_auth(&token).query(query);
            if let Some(json) = body {
                request = request.json(json);
            }
            if let Some(value) = prefer {
                request = request.header("Prefer", value);
            }

            let response = self.http.send(request).await.map_err(|err| match err {
                HttpError::Timeout(msg) | HttpError::Transport(msg) => GatewayError::Network(msg),
                HttpError::InvalidRequest(msg) => GatewayError::InvalidRequest(msg),
            })?;

            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                if !self.credentials.is_owned() {
                    warn!(%url, "externally supplied credential rejected");
                    return Err(GatewayError::ExternalCredentialExpired);
                }
                if renewals_remaining == 0 {
                    error!(%url, "still unauthorized after credential renewal");
                    return Err(GatewayError::Unauthorized);
                }
                warn!(%url, "credential rejected, renewing once");
                self.credentials.renew().await?;
                renewals_remaining -= 1;
                continue;
            }

            if !status.is_success() {
                let message = Self::error_message(response).await;
                error!(%url, status = status.as_u16(), %message, "API call failed");
                return Err(GatewayError::Api { status: status.as_u16(), message });
            }

            debug!(%url, status = status.as_u16(), "API call succeeded");
            return Ok(response);
        }
    }

    /// Best-effort extraction of the provider's error message.
    async fn error_message(response: Response) -> String {
        let raw = response.text().await.unwrap_or_default();
        match serde_json::from_str::<GraphErrorBody>(&raw) {
            Ok(GraphErrorBody { error: Some(detail) }) => {
                let code = detail.code.unwrap_or_default();
                let message = detail.message.unwrap_or_default();
                if code.is_empty() {
                    message
                } else {
                    format!("{code}: {message}")
                }
            }
            _ => raw,
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, GatewayError> {
        response
            .json::<T>()
            .await
            .map_err(|err| GatewayError::MalformedPayload(err.to_string()))
    }

    /// List unread inbox messages, newest first.
    pub async fn list_unread(&self, top: u32) -> Result<Vec<EmailSummary>, GatewayError> {
        let url = self.mailbox_url("mailFolders/inbox/messages");
        let query = [
            ("$filter", "isRead eq false".to_string()),
            ("$orderby", "receivedDateTime desc".to_string()),
            ("$top", top.to_string()),
            (
                "$select",
                "id,subject,from,receivedDateTime,bodyPreview,importance,hasAttachments"
                    .to_string(),
            ),
        ];

        let response = self.call(Method::GET, &url, &query, None, None).await?;
        let listing: GraphList<GraphMessage> = Self::decode(response).await?;
        listing.value.into_iter().map(EmailSummary::try_from).collect()
    }

    /// Fetch a single message with its full body.
    pub async fn fetch_message(&self, message_id: &str) -> Result<EmailDetail, GatewayError> {
        let url = self.mailbox_url(&format!("messages/{message_id}"));
        let query = [("$select", "id,subject,from,body,toRecipients".to_string())];

        let response = self.call(Method::GET, &url, &query, None, None).await?;
        let message: GraphMessageDetail = Self::decode(response).await?;
        message.try_into()
    }

    /// Calendar events in `[start, end)`, as busy intervals in provider
    /// order. The timezone preference pins returned date-times to UTC.
    pub async fn busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, GatewayError> {
        let url = self.mailbox_url("calendarView");
        let query = [
            ("startDateTime", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("endDateTime", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("$orderby", "start/dateTime".to_string()),
            ("$select", "subject,start,end".to_string()),
            ("$top", "100".to_string()),
        ];

        let response = self
            .call(Method::GET, &url, &query, None, Some("outlook.timezone=\"UTC\""))
            .await?;
        let listing: GraphList<GraphEvent> = Self::decode(response).await?;
        listing.value.into_iter().map(BusyInterval::try_from).collect()
    }

    /// Create a standalone draft message; returns its provider id.
    pub async fn create_draft(&self, draft: &OutgoingDraft) -> Result<String, GatewayError> {
        let url = self.mailbox_url("messages");
        let recipients: Vec<Value> = draft
            .to_recipients
            .iter()
            .map(|address| serde_json::json!({ "emailAddress": { "address": address } }))
            .collect();
        let payload = serde_json::json!({
            "subject": draft.subject,
            "body": OutgoingBody::html(draft.body_html.clone()),
            "toRecipients": recipients,
        });

        let response = self.call(Method::POST, &url, &[], Some(&payload), None).await?;
        let created: GraphCreated = Self::decode(response).await?;
        Ok(created.id)
    }

    /// Create a reply draft to an existing message and set its body; returns
    /// the draft's provider id. Graph's createReply produces an empty draft,
    /// so the body is patched in as a second call.
    pub async fn create_reply_draft(
        &self,
        message_id: &str,
        body_html: &str,
    ) -> Result<String, GatewayError> {
        let create_url = self.mailbox_url(&format!("messages/{message_id}/createReply"));
        let response = self.call(Method::POST, &create_url, &[], None, None).await?;
        let created: GraphCreated = Self::decode(response).await?;

        let patch_url = self.mailbox_url(&format!("messages/{}", created.id));
        let payload = serde_json::json!({ "body": OutgoingBody::html(body_html) });
        self.call(Method::PATCH, &patch_url, &[], Some(&payload), None).await?;

        Ok(created.id)
    }

    /// Mark a message as read.
    pub async fn mark_read(&self, message_id: &str) -> Result<(), GatewayError> {
        let url = self.mailbox_url(&format!("messages/{message_id}"));
        let payload = serde_json::json!({ "isRead": true });
        self.call(Method::PATCH, &url, &[], Some(&payload), None).await?;
        Ok(())
    }
}
