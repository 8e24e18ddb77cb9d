//! # forge_domain - Core data model for AppForge
//!
//! This crate defines the types shared across the generation orchestrator:
//! - [`Subject`] - the generation target (a "project") with its files and status
//! - [`FileArtifact`] - a single generated file or directory entry
//! - [`ChatMessage`] - the append-only conversation log entry
//! - [`GenerationEvent`] - the wire envelope streamed to subscribers
//!
//! All wire-facing types serialize with camelCase field names.

pub mod events;
pub mod messages;
pub mod models;

pub use events::*;
pub use messages::*;
pub use models::*;
