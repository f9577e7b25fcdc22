//! Bearer credential management
//!
//! The credential is the only shared mutable state in the system. It is
//! owned by a single [`CredentialStore`] handle; callers only ever see the
//! header value it produces.

mod store;
mod types;

pub use store::{CredentialError, CredentialStore};
pub use types::TokenSet;
