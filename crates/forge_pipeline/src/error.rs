//! Error types for the orchestrator.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Faults that terminate a generation job.
///
/// Parse and validation failures never appear here; they are absorbed by the
/// fallback generator before a job can observe them.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    Provider(#[from] forge_providers::ProviderError),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] forge_persistence::PersistenceError),

    #[error("generation cancelled")]
    Cancelled,
}
