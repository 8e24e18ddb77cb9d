//! Priority-ordered provider selection.

use std::sync::Arc;

use tracing::info;

use crate::anthropic::AnthropicProvider;
use crate::error::{ProviderError, ProviderResult};
use crate::openai::OpenAiProvider;
use crate::traits::GenerationProvider;

/// Environment variable overriding the default model for all adapters
pub const MODEL_ENV: &str = "FORGE_MODEL";

/// Holds the configured adapters in priority order.
///
/// Which adapters exist is an external (configuration) concern; the selector
/// only answers "first usable" and "next after this one". A job picks one
/// provider at admission and keeps it for its whole analyze/generate
/// sequence; fallback happens only at job start.
#[derive(Clone, Default)]
pub struct ProviderSelector {
    providers: Vec<Arc<dyn GenerationProvider>>,
}

impl ProviderSelector {
    /// Create a selector over an explicit priority-ordered adapter list
    pub fn new(providers: Vec<Arc<dyn GenerationProvider>>) -> Self {
        Self { providers }
    }

    /// Build the adapter list from environment variables.
    ///
    /// Checks in order:
    /// 1. OPENAI_API_KEY
    /// 2. ANTHROPIC_API_KEY
    ///
    /// A `FORGE_MODEL` value overrides the default model of every adapter.
    pub fn from_env() -> Self {
        let custom_model = std::env::var(MODEL_ENV).ok();
        let mut providers: Vec<Arc<dyn GenerationProvider>> = Vec::new();

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            if !api_key.is_empty() {
                providers.push(Arc::new(OpenAiProvider::new(api_key, custom_model.clone())));
            }
        }

        if let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") {
            if !api_key.is_empty() {
                providers.push(Arc::new(AnthropicProvider::new(api_key, custom_model)));
            }
        }

        info!(count = providers.len(), "configured generation providers");
        Self { providers }
    }

    /// The highest-priority usable adapter, or `NoProviderConfigured`
    pub fn select_initial(&self) -> ProviderResult<Arc<dyn GenerationProvider>> {
        self.providers
            .first()
            .cloned()
            .ok_or(ProviderError::NoProviderConfigured)
    }

    /// The next usable adapter strictly after `current` in priority order
    pub fn next(&self, current: &str) -> Option<Arc<dyn GenerationProvider>> {
        let idx = self.providers.iter().position(|p| p.name() == current)?;
        self.providers.get(idx + 1).cloned()
    }

    /// Number of configured adapters
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no adapter is configured
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::traits::AnalysisResult;

    struct NamedProvider(&'static str);

    #[async_trait]
    impl GenerationProvider for NamedProvider {
        fn name(&self) -> &str {
            self.0
        }

        async fn analyze(&self, _description: &str) -> ProviderResult<AnalysisResult> {
            Ok(AnalysisResult::default())
        }

        async fn generate_files(&self, _analysis: &AnalysisResult) -> ProviderResult<String> {
            Ok(String::new())
        }
    }

    fn selector(names: &[&'static str]) -> ProviderSelector {
        ProviderSelector::new(
            names
                .iter()
                .map(|n| Arc::new(NamedProvider(n)) as Arc<dyn GenerationProvider>)
                .collect(),
        )
    }

    #[test]
    fn test_select_initial_returns_highest_priority() {
        let selector = selector(&["openai", "anthropic"]);
        assert_eq!(selector.select_initial().unwrap().name(), "openai");
    }

    #[test]
    fn test_select_initial_fails_when_empty() {
        let selector = ProviderSelector::default();
        assert!(matches!(
            selector.select_initial(),
            Err(ProviderError::NoProviderConfigured)
        ));
    }

    #[test]
    fn test_next_walks_priority_order() {
        let selector = selector(&["openai", "anthropic"]);
        assert_eq!(selector.next("openai").unwrap().name(), "anthropic");
        assert!(selector.next("anthropic").is_none());
        assert!(selector.next("unknown").is_none());
    }
}
