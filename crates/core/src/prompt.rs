//! Reply prompt template
//!
//! Formatting rules for the generation request live here, centralized and
//! testable independent of the network call. The template is rendered to a
//! single string exactly once, at the generation-service boundary.

use chrono_tz::Tz;
use draftpilot_domain::{AvailableSlot, EmailDetail};
use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

const SYSTEM_INSTRUCTION: &str = "You are an email assistant that drafts professional responses. \
     Consider the calendar availability when mentioned. Be concise but polite.";

const CONSTRAINTS: &str = "If the mail requires my availability then suggest suitable time slots \
     from the availability listed above, otherwise ignore it and carefully draft a concise, \
     professional email response. Do not include anything else apart from the email response.";

/// Structured prompt for one reply draft.
#[derive(Debug, Clone)]
pub struct ReplyPrompt {
    pub system_instruction: String,
    pub user_context: String,
    pub constraints: String,
}

impl ReplyPrompt {
    /// Build the prompt for replying to `message`, with `availability`
    /// already rendered by [`render_availability`].
    pub fn for_reply(message: &EmailDetail, availability: &str) -> Self {
        let sender = message.from_name.as_deref().unwrap_or(&message.from_address);
        let body = strip_html(&message.body_html);

        let user_context = format!(
            "Original email from {sender}:\nSubject: {subject}\n\n{body}\n\n{availability}\n\n\
             Draft a professional response to this email.",
            subject = message.subject,
        );

        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_context,
            constraints: CONSTRAINTS.to_string(),
        }
    }

    /// Render the template into the flat string sent to the model.
    pub fn render(&self) -> String {
        format!(
            "<s>\n{}\n</s>\n\n{}\n\n{}\n",
            self.system_instruction, self.user_context, self.constraints
        )
    }
}

/// Replace HTML tags with spaces, keeping the visible text.
pub fn strip_html(html: &str) -> String {
    HTML_TAG.replace_all(html, " ").into_owned()
}

/// Render the first `limit` slots as a bulleted availability section in the
/// given timezone, or a fully-booked note when there are none.
pub fn render_availability(slots: &[AvailableSlot], limit: usize, tz: Tz) -> String {
    if slots.is_empty() {
        return "I have no open time slots in my calendar over the coming days.".to_string();
    }

    let mut out = String::from("My availability over the coming days:");
    for slot in slots.iter().take(limit) {
        let start = slot.start.with_timezone(&tz);
        let end = slot.end.with_timezone(&tz);
        out.push_str(&format!(
            "\n- {} from {} to {} ({} minutes)",
            start.format("%A, %B %d"),
            start.format("%I:%M %p"),
            end.format("%I:%M %p"),
            slot.duration_minutes,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn message() -> EmailDetail {
        EmailDetail {
            id: "m1".to_string(),
            subject: "Project sync".to_string(),
            from_address: "priya@example.com".to_string(),
            from_name: Some("Priya".to_string()),
            body_html: "<p>Can we meet <b>this week</b>?</p>".to_string(),
            to_recipients: vec!["team@example.com".to_string()],
        }
    }

    #[test]
    fn strips_tags_but_keeps_text() {
        let text = strip_html("<p>Can we meet <b>this week</b>?</p>");
        assert!(text.contains("Can we meet"));
        assert!(text.contains("this week"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn rendered_prompt_carries_all_sections() {
        let prompt = ReplyPrompt::for_reply(&message(), "My availability: none");
        let rendered = prompt.render();

        assert!(rendered.starts_with("<s>\n"));
        assert!(rendered.contains("Original email from Priya:"));
        assert!(rendered.contains("Subject: Project sync"));
        assert!(rendered.contains("My availability: none"));
        assert!(rendered.contains("Do not include anything else"));
    }

    #[test]
    fn falls_back_to_address_when_name_missing() {
        let mut msg = message();
        msg.from_name = None;
        let prompt = ReplyPrompt::for_reply(&msg, "");
        assert!(prompt.user_context.contains("from priya@example.com:"));
    }

    #[test]
    fn availability_lists_top_slots_only() {
        let day = |d: u32, h: u32| Utc.with_ymd_and_hms(2025, 6, d, h, 0, 0).unwrap();
        let slots = vec![
            AvailableSlot::new(day(2, 9), day(2, 10)),
            AvailableSlot::new(day(3, 9), day(3, 10)),
            AvailableSlot::new(day(4, 9), day(4, 10)),
            AvailableSlot::new(day(5, 9), day(5, 10)),
        ];

        let rendered = render_availability(&slots, 3, chrono_tz::UTC);
        assert_eq!(rendered.matches("\n- ").count(), 3);
        assert!(rendered.contains("Monday, June 02"));
        assert!(rendered.contains("(60 minutes)"));
    }

    #[test]
    fn empty_availability_renders_fallback() {
        let rendered = render_availability(&[], 3, chrono_tz::UTC);
        assert!(rendered.contains("no open time slots"));
    }
}
