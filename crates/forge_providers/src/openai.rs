//! OpenAI chat-completions adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::traits::{strip_code_fences, AnalysisResult, GenerationProvider};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-5-mini";
const MAX_RETRIES: u32 = 3;

/// Adapter for the OpenAI chat completions API.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a new adapter with an explicit key and optional model override
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    /// The configured model
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the raw completion text.
    ///
    /// Retries transient failures (network errors, 5xx, 429) with
    /// exponential backoff: 1s, 2s, 4s.
    async fn complete(&self, prompt: &str) -> ProviderResult<String> {
        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_completion_tokens: Some(4096),
        };

        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = std::time::Duration::from_secs(1 << attempt);
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(API_URL)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = Some(ProviderError::unavailable(format!("Network error: {}", e)));
                    continue;
                }
            };

            let status = response.status();

            if status.is_server_error() || status.as_u16() == 429 {
                let body = response.text().await.unwrap_or_default();
                last_error = Some(ProviderError::unavailable(format!(
                    "OpenAI API error {} (attempt {}/{}): {}",
                    status,
                    attempt + 1,
                    MAX_RETRIES,
                    body
                )));
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::unavailable(format!(
                    "OpenAI API error {}: {}",
                    status, body
                )));
            }

            let result: OpenAiResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::response_parse(format!("Invalid response body: {}", e)))?;

            return result
                .choices
                .first()
                .map(|c| c.message.content.clone())
                .ok_or_else(|| ProviderError::response_parse("No choices in OpenAI response"));
        }

        Err(last_error
            .unwrap_or_else(|| ProviderError::unavailable("Max retries exceeded")))
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn analyze(&self, description: &str) -> ProviderResult<AnalysisResult> {
        let raw = self.complete(&crate::prompts::analysis(description)).await?;
        debug!(provider = "openai", "analysis response received");
        serde_json::from_str(strip_code_fences(&raw))
            .map_err(|e| ProviderError::response_parse(format!("Invalid analysis shape: {}", e)))
    }

    async fn generate_files(&self, analysis: &AnalysisResult) -> ProviderResult<String> {
        self.complete(&crate::prompts::generation(analysis)).await
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        let provider = OpenAiProvider::new("key".to_string(), None);
        assert_eq!(provider.model(), DEFAULT_MODEL);
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_custom_model() {
        let provider = OpenAiProvider::new("key".to_string(), Some("gpt-4o".to_string()));
        assert_eq!(provider.model(), "gpt-4o");
    }
}
