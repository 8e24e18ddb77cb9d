//! Prompt construction shared by all adapters.
//!
//! Every backend receives the same instructions; only transport differs.

use crate::traits::AnalysisResult;

const ANALYSIS_INSTRUCTIONS: &str = r#"You are a project analyst. Summarize the project description below as JSON with exactly these fields:
{"suggestedName": string, "kind": string, "features": [string], "uiNotes": string, "stack": [string]}

Respond with JSON only, no prose and no code fences."#;

const GENERATION_INSTRUCTIONS: &str = r#"You are a project generator. Produce the complete source files for the project described below. Respond with a JSON array only, no prose and no code fences. Each element must have:
{"path": string, "content": string, "type": "file" | "directory", "language": string}

Paths are relative, forward-slash separated and unique. Include every file needed to run the project."#;

/// Build the analysis prompt for a free-text description
pub fn analysis(description: &str) -> String {
    format!("{}\n\nProject description:\n{}", ANALYSIS_INSTRUCTIONS, description)
}

/// Build the file-generation prompt from an analysis
pub fn generation(analysis: &AnalysisResult) -> String {
    format!(
        "{}\n\nProject: {}\nKind: {}\nFeatures: {}\nUI notes: {}\nStack: {}",
        GENERATION_INSTRUCTIONS,
        analysis.suggested_name,
        analysis.kind,
        analysis.features.join(", "),
        analysis.ui_notes,
        analysis.stack.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_prompt_carries_analysis() {
        let analysis_result = AnalysisResult {
            suggested_name: "hello-world".to_string(),
            kind: "landing-page".to_string(),
            features: vec!["greeting".to_string()],
            ..Default::default()
        };
        let prompt = generation(&analysis_result);
        assert!(prompt.contains("hello-world"));
        assert!(prompt.contains("greeting"));
    }
}
