//! # forge_providers - Generation provider adapters for AppForge
//!
//! Every external generation backend is wrapped in an adapter implementing
//! the [`GenerationProvider`] capability: `analyze` a free-text description
//! into structured facts, then `generate_files` from those facts. Adapters
//! are substitutable behind the trait; the pipeline never depends on a
//! concrete backend.
//!
//! The [`ProviderSelector`] orders configured adapters by preference and
//! answers "first usable provider" / "next provider after this one".

pub mod anthropic;
pub mod error;
pub mod openai;
pub mod prompts;
pub mod selector;
pub mod traits;

pub use anthropic::AnthropicProvider;
pub use error::{ProviderError, ProviderResult};
pub use openai::OpenAiProvider;
pub use selector::ProviderSelector;
pub use traits::{strip_code_fences, AnalysisResult, GenerationProvider};
