//! Subjects and the file artifacts generated for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a subject
pub type SubjectId = String;

/// Lifecycle status of a subject
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubjectStatus {
    /// A generation job is currently running for this subject
    Generating,
    /// The last generation completed and files are available
    Ready,
    /// The last generation failed; prior files are untouched
    Error,
}

/// Kind of a generated artifact
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    File,
    Directory,
}

impl Default for ArtifactKind {
    fn default() -> Self {
        Self::File
    }
}

/// A single generated file or directory entry.
///
/// Paths are forward-slash separated and unique within a subject;
/// insertion order is generation order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileArtifact {
    /// Path relative to the project root
    pub path: String,
    /// Raw file content (empty for directories)
    pub content: String,
    /// File or directory
    #[serde(default)]
    pub kind: ArtifactKind,
    /// Optional language hint, free text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl FileArtifact {
    /// Create a file artifact with content
    pub fn file(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            kind: ArtifactKind::File,
            language: None,
        }
    }

    /// Set the language hint
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// The generation target: a project with its files and status.
///
/// Owned by the running pipeline while a job is in flight and by the
/// persistence layer at rest between jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Subject identifier
    pub id: SubjectId,
    /// Current status
    pub status: SubjectStatus,
    /// Generated files in generation order, paths unique
    pub files: Vec<FileArtifact>,
    /// Preview URL, set only after a successful deploy step
    #[serde(rename = "previewUrl", skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    /// When the subject was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// When the subject was last updated
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Subject {
    /// Create a new subject in the `Generating` state with no files
    pub fn new(id: impl Into<SubjectId>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: SubjectStatus::Generating,
            files: Vec::new(),
            preview_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_subject() {
        let subject = Subject::new("proj-1");
        assert_eq!(subject.status, SubjectStatus::Generating);
        assert!(subject.files.is_empty());
        assert!(subject.preview_url.is_none());
    }

    #[test]
    fn test_artifact_kind_defaults_to_file() {
        let artifact: FileArtifact =
            serde_json::from_str(r#"{"path": "src/main.rs", "content": ""}"#).unwrap();
        assert_eq!(artifact.kind, ArtifactKind::File);
    }

    #[test]
    fn test_subject_serialization_uses_camel_case() {
        let subject = Subject::new("proj-1");
        let json = serde_json::to_value(&subject).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("previewUrl").is_none());
    }
}
