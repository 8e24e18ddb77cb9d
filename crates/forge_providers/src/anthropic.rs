//! Anthropic messages-API adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::traits::{strip_code_fences, AnalysisResult, GenerationProvider};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4.5";
const MAX_RETRIES: u32 = 3;

/// Adapter for the Anthropic messages API.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
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
    /// Same transient-failure retry policy as the OpenAI adapter.
    async fn complete(&self, prompt: &str) -> ProviderResult<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: 4096,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
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
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
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
                    "Anthropic API error {} (attempt {}/{}): {}",
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
                    "Anthropic API error {}: {}",
                    status, body
                )));
            }

            let result: AnthropicResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::response_parse(format!("Invalid response body: {}", e)))?;

            return result
                .content
                .first()
                .map(|c| c.text.clone())
                .ok_or_else(|| ProviderError::response_parse("No content in Anthropic response"));
        }

        Err(last_error
            .unwrap_or_else(|| ProviderError::unavailable("Max retries exceeded")))
    }
}

#[async_trait]
impl GenerationProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn analyze(&self, description: &str) -> ProviderResult<AnalysisResult> {
        let raw = self.complete(&crate::prompts::analysis(description)).await?;
        debug!(provider = "anthropic", "analysis response received");
        serde_json::from_str(strip_code_fences(&raw))
            .map_err(|e| ProviderError::response_parse(format!("Invalid analysis shape: {}", e)))
    }

    async fn generate_files(&self, analysis: &AnalysisResult) -> ProviderResult<String> {
        self.complete(&crate::prompts::generation(analysis)).await
    }
}

// Anthropic API types
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        let provider = AnthropicProvider::new("key".to_string(), None);
        assert_eq!(provider.model(), DEFAULT_MODEL);
        assert_eq!(provider.name(), "anthropic");
    }
}
