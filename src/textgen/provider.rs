//! Text-generation provider trait definition.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Options for a generation request.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Ceiling on the generated output length.
    pub max_output_tokens: u32,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 512,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Errors that can occur when interacting with a text-generation provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Outcome of a successful round trip to the provider.
///
/// A content-safety block is data, not an error: the caller degrades to an
/// empty result and shows the feedback, it does not abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The generated text.
    Text(String),
    /// The provider refused to answer, with its stated reason.
    Blocked { reason: String },
}

/// Trait for text-generation providers.
#[async_trait]
pub trait TextGenProvider: Send + Sync {
    /// Get the provider's name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Get the model being used.
    fn model(&self) -> &str;

    /// Generate text for a single prompt.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationOutcome, GenerationError>;
}
