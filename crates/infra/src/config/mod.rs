//! Environment-based configuration loading

mod loader;

pub use loader::{load, AppConfig};
