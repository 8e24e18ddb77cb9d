//! Error types for the provider layer.

use thiserror::Error;

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur talking to a generation provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No usable adapter is configured; a job can never start
    #[error("No generation provider configured. Set OPENAI_API_KEY or ANTHROPIC_API_KEY")]
    NoProviderConfigured,

    /// Network, auth or configuration failure calling the provider
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The provider replied, but the response shape is invalid
    #[error("Provider response could not be decoded: {0}")]
    ResponseParse(String),
}

impl ProviderError {
    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Create a response-parse error.
    pub fn response_parse(message: impl Into<String>) -> Self {
        Self::ResponseParse(message.into())
    }

    /// Whether another adapter could still serve the request.
    ///
    /// Parse failures are local to the adapter's reply; unavailability and
    /// missing configuration are candidates for trying elsewhere.
    pub fn is_retryable_elsewhere(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
