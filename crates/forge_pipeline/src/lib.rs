//! # forge_pipeline - Generation job orchestrator for AppForge
//!
//! This crate drives one generation request from free text to a persisted
//! file set:
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ JobRegistry  │───▶│  Pipeline    │───▶│ ProviderSelector │
//! │ (admission)  │    │ (stages)     │    │ + adapter        │
//! └──────────────┘    └──────┬───────┘    └──────────────────┘
//!                            │
//!              ┌─────────────┼─────────────┐
//!              ▼             ▼             ▼
//!      ┌────────────┐ ┌────────────┐ ┌────────────┐
//!      │   Parser   │ │  EventHub  │ │SubjectStore│
//!      │ + fallback │ │ (fan-out)  │ │ (durable)  │
//!      └────────────┘ └────────────┘ └────────────┘
//! ```
//!
//! Key guarantees:
//! - at most one job per subject at any time ([`JobRegistry`])
//! - progress percents are non-decreasing per job and end at 100 on success
//! - provider output that fails to parse or validate is replaced by a
//!   deterministic fallback project; parsing never fails a job
//! - events reach every subscriber present at publish time, in publish order
//!   for that subject; there is no backlog replay for late joiners

pub mod deploy;
pub mod error;
pub mod fallback;
pub mod hub;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod stage;

pub use deploy::{DeployError, PreviewDeployer};
pub use error::{PipelineError, PipelineResult};
pub use fallback::fallback_project;
pub use hub::EventHub;
pub use parser::{parse_artifacts, parse_or_fallback, ParseError};
pub use pipeline::GenerationPipeline;
pub use registry::{CancelToken, JobRegistry, ReleaseGuard};
pub use stage::Stage;
