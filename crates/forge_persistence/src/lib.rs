//! # forge_persistence - Durable subject storage for AppForge
//!
//! The orchestrator consumes storage through the [`SubjectStore`] trait:
//! read a subject, apply a partial update, append to its message log.
//! Two implementations ship here:
//!
//! - [`FsStore`] - per-subject directory with `subject.json` and an
//!   append-only `messages.jsonl`
//! - [`MemStore`] - in-memory store for tests and embedders

pub mod error;
pub mod fs;
pub mod memory;
pub mod store;

pub use error::{PersistenceError, PersistenceResult};
pub use fs::FsStore;
pub use memory::MemStore;
pub use store::{SubjectPatch, SubjectStore};
