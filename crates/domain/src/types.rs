//! Common data types used throughout the application

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{DraftPilotError, Result};

/// A calendar event's span, treated as unavailable for new meetings.
///
/// Construction enforces `start <= end`; the interval is immutable after
/// that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    label: String,
}

impl BusyInterval {
    /// Create a validated busy interval.
    ///
    /// # Errors
    /// Returns `DraftPilotError::InvalidInput` if `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, label: impl Into<String>) -> Result<Self> {
        if start > end {
            return Err(DraftPilotError::InvalidInput(format!(
                "busy interval starts after it ends ({start} > {end})"
            )));
        }
        Ok(Self { start, end, label: label.into() })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Daily start/end hour boundary within which availability is computed.
///
/// Hours are whole local hours in the configured timezone; `end_hour` of 24
/// means "until local midnight".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingWindow {
    start_hour: u32,
    end_hour: u32,
    timezone: Tz,
}

impl WorkingWindow {
    /// Create a validated working window.
    ///
    /// # Errors
    /// Returns `DraftPilotError::InvalidInput` unless
    /// `0 <= start_hour < end_hour <= 24`.
    pub fn new(start_hour: u32, end_hour: u32, timezone: Tz) -> Result<Self> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(DraftPilotError::InvalidInput(format!(
                "invalid working window {start_hour}..{end_hour} (need 0 <= start < end <= 24)"
            )));
        }
        Ok(Self { start_hour, end_hour, timezone })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

/// A contiguous free interval inside a working window.
///
/// Derived data, never mutated after creation. `duration_minutes` is always
/// `end - start` in whole minutes and never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl AvailableSlot {
    /// Build a slot from its boundaries, deriving the duration.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let duration_minutes = (end - start).num_minutes().max(0);
        Self { start, end, duration_minutes }
    }
}

/// Unread-inbox listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSummary {
    pub id: String,
    pub subject: String,
    pub from_address: String,
    pub from_name: Option<String>,
    pub received_at: DateTime<Utc>,
    pub body_preview: Option<String>,
    pub importance: Option<String>,
    pub has_attachments: bool,
}

/// Full message as fetched by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDetail {
    pub id: String,
    pub subject: String,
    pub from_address: String,
    pub from_name: Option<String>,
    /// Raw provider body, usually HTML
    pub body_html: String,
    pub to_recipients: Vec<String>,
}

/// A draft message to be persisted on the provider side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingDraft {
    pub subject: String,
    /// HTML body content
    pub body_html: String,
    pub to_recipients: Vec<String>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn busy_interval_rejects_reversed_bounds() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        assert!(BusyInterval::new(start, end, "standup").is_err());
        assert!(BusyInterval::new(end, start, "standup").is_ok());
    }

    #[test]
    fn busy_interval_allows_zero_length() {
        let at = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
        assert!(BusyInterval::new(at, at, "reminder").is_ok());
    }

    #[test]
    fn working_window_validates_hours() {
        assert!(WorkingWindow::new(9, 17, chrono_tz::UTC).is_ok());
        assert!(WorkingWindow::new(0, 24, chrono_tz::UTC).is_ok());
        assert!(WorkingWindow::new(17, 9, chrono_tz::UTC).is_err());
        assert!(WorkingWindow::new(9, 9, chrono_tz::UTC).is_err());
        assert!(WorkingWindow::new(9, 25, chrono_tz::UTC).is_err());
    }

    #[test]
    fn slot_duration_is_whole_minutes() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 2, 17, 0, 0).unwrap();
        let slot = AvailableSlot::new(start, end);
        assert_eq!(slot.duration_minutes, 480);
    }
}
