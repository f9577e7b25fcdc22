//! # Draftpilot Core
//!
//! Pure business logic and port interfaces.
//!
//! This crate contains:
//! - The availability engine (free/busy slot computation)
//! - The draft sanitizer (generation artifact cleanup)
//! - The reply prompt template
//! - Port traits implemented by `draftpilot-infra`
//!
//! ## Architecture
//! - Depends only on `draftpilot-domain`
//! - No I/O: everything here is deterministic and unit-testable

pub mod availability;
pub mod ports;
pub mod prompt;
pub mod sanitize;

pub use availability::find_available_slots;
pub use ports::{DraftGenerator, MailboxGateway};
pub use prompt::ReplyPrompt;
pub use sanitize::{sanitize, sanitize_with, SanitizePolicy};
