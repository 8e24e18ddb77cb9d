//! The storage capability consumed by the orchestrator.

use async_trait::async_trait;

use forge_domain::{ChatMessage, FileArtifact, Subject, SubjectStatus};

use crate::error::PersistenceResult;

/// Partial update applied to a subject's at-rest state.
///
/// Only the populated fields change; `files` replaces the whole artifact
/// list atomically with respect to readers of the store.
#[derive(Debug, Clone, Default)]
pub struct SubjectPatch {
    /// New status, if changing
    pub status: Option<SubjectStatus>,
    /// Complete replacement file set, if changing
    pub files: Option<Vec<FileArtifact>>,
    /// New preview URL, if changing
    pub preview_url: Option<String>,
}

impl SubjectPatch {
    /// Patch only the status
    pub fn status(status: SubjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Replace the file set
    pub fn with_files(mut self, files: Vec<FileArtifact>) -> Self {
        self.files = Some(files);
        self
    }

    /// Set the preview URL
    pub fn with_preview_url(mut self, url: impl Into<String>) -> Self {
        self.preview_url = Some(url.into());
        self
    }
}

/// Durable store for subject status, file set and message log.
///
/// All operations are fallible; the pipeline treats a terminal-write failure
/// as a job error.
#[async_trait]
pub trait SubjectStore: Send + Sync {
    /// Fetch a subject by id
    async fn get_subject(&self, id: &str) -> PersistenceResult<Subject>;

    /// Apply a partial update, creating the subject if it does not exist
    async fn update_subject(&self, id: &str, patch: SubjectPatch) -> PersistenceResult<Subject>;

    /// Append a message to the subject's append-only log
    async fn append_message(&self, subject_id: &str, message: ChatMessage)
        -> PersistenceResult<()>;

    /// Read the full message log for a subject
    async fn messages(&self, subject_id: &str) -> PersistenceResult<Vec<ChatMessage>>;
}
