//! The provider capability contract shared by all adapters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderResult;

/// Structured facts extracted from a free-text project description.
///
/// Best effort: adapters tolerate loosely shaped provider replies, so every
/// field defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Suggested project name
    #[serde(rename = "suggestedName", default)]
    pub suggested_name: String,
    /// Kind of project (e.g. "landing-page", "dashboard")
    #[serde(default)]
    pub kind: String,
    /// Key features requested by the description
    #[serde(default)]
    pub features: Vec<String>,
    /// Notes about the desired look and feel
    #[serde(rename = "uiNotes", default)]
    pub ui_notes: String,
    /// Suggested technology stack
    #[serde(default)]
    pub stack: Vec<String>,
}

/// Capability implemented once per backing generation service.
///
/// Both operations are remote calls; adapters perform no persistence.
/// `Unavailable` signals a transport/auth/config failure, `ResponseParse`
/// a reply whose shape could not be decoded.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Short adapter name used for selection and logging
    fn name(&self) -> &str;

    /// Summarize a free-text description into structured facts
    async fn analyze(&self, description: &str) -> ProviderResult<AnalysisResult>;

    /// Generate raw text expected to decode into a list of file records
    async fn generate_files(&self, analysis: &AnalysisResult) -> ProviderResult<String>;
}

/// Strip fenced-code wrapping and surrounding whitespace from provider text.
///
/// Providers routinely wrap JSON replies in ```json fences despite being
/// asked not to; normalize before any decode attempt.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line, if any
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_text_is_untouched() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fences_with_language_tag() {
        let raw = "```json\n[{\"path\": \"a\"}]\n```";
        assert_eq!(strip_code_fences(raw), "[{\"path\": \"a\"}]");
    }

    #[test]
    fn test_strip_fences_without_language_tag() {
        let raw = "```\n{}\n```";
        assert_eq!(strip_code_fences(raw), "{}");
    }

    #[test]
    fn test_analysis_tolerates_missing_fields() {
        let analysis: AnalysisResult =
            serde_json::from_str(r#"{"suggestedName": "hello-world"}"#).unwrap();
        assert_eq!(analysis.suggested_name, "hello-world");
        assert!(analysis.features.is_empty());
    }
}
