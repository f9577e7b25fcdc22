//! Local generation service integration

mod client;

pub use client::{GenerationError, OllamaClient};
