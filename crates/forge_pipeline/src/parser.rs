//! Turning raw provider text into a validated artifact list.
//!
//! The public contract is [`parse_or_fallback`]: it always returns a valid,
//! non-empty file set. Whether the real provider output or the fallback was
//! used is reported only as a flag for logging and tests, never as an error.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use forge_domain::{ArtifactKind, FileArtifact};

use crate::fallback::fallback_project;

/// Why raw provider output was rejected.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Not decodable as an array of file records
    #[error("Output is not a file list: {0}")]
    Decode(String),

    /// Decoded, but the file set violates an invariant
    #[error("Invalid file set: {0}")]
    Validation(String),
}

/// A file record as providers emit it: `type` is optional and defaults to
/// a plain file.
#[derive(Debug, Deserialize)]
struct RawArtifact {
    path: String,
    content: String,
    #[serde(rename = "type", default)]
    kind: ArtifactKind,
    #[serde(default)]
    language: Option<String>,
}

/// Decode and validate raw provider output.
///
/// Rejects (rather than silently drops) on the first violation: empty array,
/// empty path, or duplicate path.
pub fn parse_artifacts(raw: &str) -> Result<Vec<FileArtifact>, ParseError> {
    let cleaned = forge_providers::strip_code_fences(raw);
    let records: Vec<RawArtifact> =
        serde_json::from_str(cleaned).map_err(|e| ParseError::Decode(e.to_string()))?;

    if records.is_empty() {
        return Err(ParseError::Validation("file list is empty".to_string()));
    }

    let mut seen = HashSet::new();
    let mut artifacts = Vec::with_capacity(records.len());
    for record in records {
        if record.path.trim().is_empty() {
            return Err(ParseError::Validation("artifact with empty path".to_string()));
        }
        if !seen.insert(record.path.clone()) {
            return Err(ParseError::Validation(format!(
                "duplicate path: {}",
                record.path
            )));
        }
        artifacts.push(FileArtifact {
            path: record.path,
            content: record.content,
            kind: record.kind,
            language: record.language,
        });
    }
    Ok(artifacts)
}

/// Parse raw provider output, falling back to the deterministic canonical
/// project when decoding or validation fails.
///
/// Never fails. The returned flag is `true` when the fallback was used.
pub fn parse_or_fallback(raw: &str, project_name: &str) -> (Vec<FileArtifact>, bool) {
    match parse_artifacts(raw) {
        Ok(artifacts) => (artifacts, false),
        Err(e) => {
            warn!(error = %e, "provider output rejected, using fallback project");
            (fallback_project(project_name), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_valid_file_list() {
        let raw = r#"[
            {"path": "index.html", "content": "<h1>Hi</h1>", "language": "html"},
            {"path": "assets", "content": "", "type": "directory"},
            {"path": "style.css", "content": "body {}"}
        ]"#;
        let artifacts = parse_artifacts(raw).unwrap();
        assert_eq!(artifacts.len(), 3);
        assert_eq!(artifacts[0].language.as_deref(), Some("html"));
        assert_eq!(artifacts[1].kind, ArtifactKind::Directory);
        assert_eq!(artifacts[2].kind, ArtifactKind::File);
    }

    #[test]
    fn test_parses_fenced_output() {
        let raw = "```json\n[{\"path\": \"a.txt\", \"content\": \"a\"}]\n```";
        assert_eq!(parse_artifacts(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_non_json() {
        assert!(matches!(parse_artifacts("not json"), Err(ParseError::Decode(_))));
    }

    #[test]
    fn test_rejects_empty_list() {
        assert!(matches!(parse_artifacts("[]"), Err(ParseError::Validation(_))));
    }

    #[test]
    fn test_rejects_duplicate_paths() {
        let raw = r#"[
            {"path": "a.txt", "content": "1"},
            {"path": "a.txt", "content": "2"}
        ]"#;
        assert!(matches!(parse_artifacts(raw), Err(ParseError::Validation(_))));
    }

    #[test]
    fn test_rejects_empty_path() {
        let raw = r#"[{"path": "  ", "content": "x"}]"#;
        assert!(matches!(parse_artifacts(raw), Err(ParseError::Validation(_))));
    }

    #[test]
    fn test_fallback_on_malformed_output() {
        let (artifacts, used_fallback) = parse_or_fallback("not json", "demo");
        assert!(used_fallback);
        assert!(!artifacts.is_empty());
        let mut paths = HashSet::new();
        assert!(artifacts.iter().all(|a| paths.insert(a.path.clone())));
    }

    #[test]
    fn test_no_fallback_on_valid_output() {
        let raw = r#"[{"path": "main.py", "content": "print('hi')"}]"#;
        let (artifacts, used_fallback) = parse_or_fallback(raw, "demo");
        assert!(!used_fallback);
        assert_eq!(artifacts.len(), 1);
    }
}
