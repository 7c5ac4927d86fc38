//! Text-generation provider abstraction layer.
//!
//! This module provides a trait-based abstraction over the external
//! text-generation capability, so the recommendation pipeline can work
//! against any backend (Gemini in production, fakes in tests).

mod gemini;
mod provider;

pub use gemini::GeminiProvider;
pub use provider::{GenerationError, GenerationOptions, GenerationOutcome, TextGenProvider};
