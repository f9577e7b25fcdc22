//! Microsoft Graph wire types
//!
//! Collection responses arrive wrapped in a `value` envelope; date-times
//! arrive either as RFC 3339 or as naive strings the provider documents as
//! UTC. Everything here is deserialization shape only; domain conversions
//! live alongside so the gateway stays thin.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use draftpilot_domain::{BusyInterval, EmailDetail, EmailSummary};

use super::GatewayError;

/// `value` envelope around every Graph collection response.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphList<T> {
    pub value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphEmailAddress {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphRecipient {
    pub email_address: Option<GraphEmailAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphBody {
    #[allow(dead_code)]
    pub content_type: Option<String>,
    pub content: Option<String>,
}

/// Message shape used for inbox listings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphMessage {
    pub id: String,
    pub subject: Option<String>,
    pub from: Option<GraphRecipient>,
    pub received_date_time: Option<String>,
    pub body_preview: Option<String>,
    pub importance: Option<String>,
    pub has_attachments: Option<bool>,
}

/// Message shape used when fetching a single message with its body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphMessageDetail {
    pub id: String,
    pub subject: Option<String>,
    pub from: Option<GraphRecipient>,
    pub body: Option<GraphBody>,
    #[serde(default)]
    pub to_recipients: Vec<GraphRecipient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphDateTime {
    pub date_time: String,
    #[allow(dead_code)]
    pub time_zone: Option<String>,
}

/// Calendar event as returned by `calendarView`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphEvent {
    pub subject: Option<String>,
    pub start: GraphDateTime,
    pub end: GraphDateTime,
}

/// Response to a create/createReply call; only the id matters.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphCreated {
    pub id: String,
}

/// Error body Graph attaches to non-success responses.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphErrorBody {
    pub error: Option<GraphErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphErrorDetail {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Outgoing message body payload for draft creation and patching.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OutgoingBody {
    pub content_type: &'static str,
    pub content: String,
}

impl OutgoingBody {
    pub fn html(content: impl Into<String>) -> Self {
        Self { content_type: "HTML", content: content.into() }
    }
}

/// Parse a Graph date-time string into UTC.
///
/// Graph emits RFC 3339 in some endpoints and, with the UTC timezone
/// preference, naive `2025-06-02T10:00:00.0000000` strings in others. The
/// naive form is taken as UTC.
pub(crate) fn parse_graph_datetime(raw: &str) -> Result<DateTime<Utc>, GatewayError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| GatewayError::MalformedPayload(format!("unparseable date-time: {raw}")))
}

fn recipient_address(recipient: &GraphRecipient) -> Option<String> {
    recipient.email_address.as_ref().and_then(|address| address.address.clone())
}

fn recipient_name(recipient: &GraphRecipient) -> Option<String> {
    recipient.email_address.as_ref().and_then(|address| address.name.clone())
}

impl TryFrom<GraphMessage> for EmailSummary {
    type Error = GatewayError;

    fn try_from(message: GraphMessage) -> Result<Self, Self::Error> {
        let received_at = match message.received_date_time {
            Some(ref raw) => parse_graph_datetime(raw)?,
            None => {
                return Err(GatewayError::MalformedPayload(format!(
                    "message {} has no receivedDateTime",
                    message.id
                )))
            }
        };

        Ok(Self {
            id: message.id,
            subject: message.subject.unwrap_or_default(),
            from_address: message
                .from
                .as_ref()
                .and_then(recipient_address)
                .unwrap_or_default(),
            from_name: message.from.as_ref().and_then(recipient_name),
            received_at,
            body_preview: message.body_preview,
            importance: message.importance,
            has_attachments: message.has_attachments.unwrap_or(false),
        })
    }
}

impl TryFrom<GraphMessageDetail> for EmailDetail {
    type Error = GatewayError;

    fn try_from(message: GraphMessageDetail) -> Result<Self, Self::Error> {
        // The fields below are projected via $select; their absence means the
        // payload is broken, not that the message has no body or sender.
        let body_html = message.body.and_then(|body| body.content).ok_or_else(|| {
            GatewayError::MalformedPayload(format!("message {} has no body content", message.id))
        })?;
        let from_address =
            message.from.as_ref().and_then(recipient_address).ok_or_else(|| {
                GatewayError::MalformedPayload(format!(
                    "message {} has no sender address",
                    message.id
                ))
            })?;

        Ok(Self {
            id: message.id,
            subject: message.subject.unwrap_or_default(),
            from_address,
            from_name: message.from.as_ref().and_then(recipient_name),
            body_html,
            to_recipients: message
                .to_recipients
                .iter()
                .filter_map(recipient_address)
                .collect(),
        })
    }
}

impl TryFrom<GraphEvent> for BusyInterval {
    type Error = GatewayError;

    fn try_from(event: GraphEvent) -> Result<Self, Self::Error> {
        let start = parse_graph_datetime(&event.start.date_time)?;
        let end = parse_graph_datetime(&event.end.date_time)?;
        BusyInterval::new(start, end, event.subject.unwrap_or_default())
            .map_err(|err| GatewayError::MalformedPayload(err.to_string()))
    }
}
