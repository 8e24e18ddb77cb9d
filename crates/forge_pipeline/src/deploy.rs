//! Seam for the external preview deployment collaborator.

use async_trait::async_trait;
use thiserror::Error;

use forge_domain::Subject;

/// Preview deployment failure.
#[derive(Error, Debug)]
#[error("Preview deployment failed: {0}")]
pub struct DeployError(pub String);

/// Turns a generated file set into a running preview.
///
/// Runs only after a subject is persisted `Ready`; a failure here leaves the
/// subject `Ready` with no preview URL and never flips it to `Error`.
#[async_trait]
pub trait PreviewDeployer: Send + Sync {
    /// Deploy the subject's files and return the preview URL
    async fn deploy(&self, subject: &Subject) -> Result<String, DeployError>;
}
