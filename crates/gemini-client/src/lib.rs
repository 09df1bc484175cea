//! Thin client for Google's generative-language API.
//!
//! One model, one endpoint (`generateContent`), no streaming. The API key
//! travels in the `x-goog-api-key` header rather than the URL so it never
//! lands in logs or proxy traces.

mod client;
mod error;
mod types;

pub use client::{GeminiClient, DEFAULT_MODEL};
pub use error::GeminiError;
pub use types::{ChatTurn, TurnRole};
