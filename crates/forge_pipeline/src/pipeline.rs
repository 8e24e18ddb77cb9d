//! The generation pipeline state machine.
//!
//! One admitted job moves through
//! `Analyzing (10%) → Planning (25%) → GeneratingFiles (40-80%) →
//! Finalizing (95%) → Ready (100%)`, with `Error` reachable from any
//! non-terminal state. Admission returns immediately; everything else runs
//! on a spawned task.
//!
//! Known partial-failure window: the in-memory broadcast may report success
//! to subscribers slightly before or after the durable terminal write
//! completes. A failure of the terminal write itself is surfaced as a job
//! error.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};

use forge_domain::{ChatMessage, GenerationEvent, ProgressEvent, Subject, SubjectStatus};
use forge_persistence::{SubjectPatch, SubjectStore};
use forge_providers::ProviderSelector;

use crate::deploy::PreviewDeployer;
use crate::error::{PipelineError, PipelineResult};
use crate::hub::EventHub;
use crate::parser::parse_or_fallback;
use crate::registry::{CancelToken, JobRegistry, ReleaseGuard};
use crate::stage::Stage;

/// Drives generation jobs from admission to a terminal state.
///
/// Cheap to clone; all state is shared. One provider is chosen at admission
/// and used for the job's whole analyze/generate sequence - adapter fallback
/// happens only at job start, not mid-stage.
#[derive(Clone)]
pub struct GenerationPipeline {
    selector: ProviderSelector,
    store: Arc<dyn SubjectStore>,
    hub: Arc<EventHub>,
    registry: Arc<JobRegistry>,
    deployer: Option<Arc<dyn PreviewDeployer>>,
}

impl GenerationPipeline {
    /// Create a pipeline over a provider selector and a subject store
    pub fn new(selector: ProviderSelector, store: Arc<dyn SubjectStore>) -> Self {
        Self {
            selector,
            store,
            hub: Arc::new(EventHub::new()),
            registry: Arc::new(JobRegistry::new()),
            deployer: None,
        }
    }

    /// Configure the optional preview deployment collaborator
    pub fn with_deployer(mut self, deployer: Arc<dyn PreviewDeployer>) -> Self {
        self.deployer = Some(deployer);
        self
    }

    /// The hub subscribers attach to
    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }

    /// The job registry gating admission
    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Subscribe to a subject's future events
    pub fn subscribe(
        &self,
        subject_id: &str,
    ) -> tokio::sync::broadcast::Receiver<GenerationEvent> {
        self.hub.subscribe(subject_id)
    }

    /// Submit a generation request.
    ///
    /// Returns `true` when the job was admitted and spawned; `false` when a
    /// generation is already running for this subject. The real result
    /// arrives via events.
    pub fn submit(&self, subject_id: &str, prompt: &str) -> bool {
        let Some(cancel) = self.registry.try_start(subject_id) else {
            warn!(subject_id, "generation already running for subject");
            return false;
        };

        let pipeline = self.clone();
        let subject_id_owned = subject_id.to_string();
        let prompt = prompt.to_string();
        let handle = tokio::spawn(async move {
            pipeline.run_job(&subject_id_owned, &prompt, cancel).await;
        });
        self.registry.attach_handle(subject_id, handle);
        true
    }

    /// Run one job to its terminal state, releasing the registry slot in all
    /// cases.
    async fn run_job(&self, subject_id: &str, prompt: &str, cancel: CancelToken) {
        let _slot = ReleaseGuard::new(self.registry.clone(), subject_id);

        match self.run_stages(subject_id, prompt, &cancel).await {
            Ok(subject) => {
                info!(subject_id, files = subject.files.len(), "generation ready");
                self.deploy_preview(&subject).await;
            }
            Err(e) => {
                error!(subject_id, error = %e, "generation failed");
                self.fail_job(subject_id, &e).await;
            }
        }
    }

    async fn run_stages(
        &self,
        subject_id: &str,
        prompt: &str,
        cancel: &CancelToken,
    ) -> PipelineResult<Subject> {
        self.store
            .update_subject(subject_id, SubjectPatch::status(SubjectStatus::Generating))
            .await?;
        self.store
            .append_message(subject_id, ChatMessage::user(prompt))
            .await?;

        let provider = self.selector.select_initial()?;
        info!(subject_id, provider = provider.name(), "starting generation");

        self.emit_stage(subject_id, Stage::Analyzing, "Analyzing requirements");
        check_cancel(cancel)?;
        let analysis = provider.analyze(prompt).await?;

        self.emit_stage(subject_id, Stage::Planning, "Planning project structure");
        check_cancel(cancel)?;
        let raw = provider.generate_files(&analysis).await?;

        // This step cannot fail the job: the parser always yields a file set
        let (files, used_fallback) = parse_or_fallback(&raw, &analysis.suggested_name);
        self.emit_stage(subject_id, Stage::GeneratingFiles, "Generating project structure");
        self.emit_progress(subject_id, 60, Stage::GeneratingFiles, "Applying styling");
        self.emit_progress(subject_id, 80, Stage::GeneratingFiles, "Wiring functionality");

        self.emit_stage(subject_id, Stage::Finalizing, "Finalizing");
        let subject = self
            .store
            .update_subject(
                subject_id,
                SubjectPatch::status(SubjectStatus::Ready).with_files(files),
            )
            .await?;
        self.store
            .append_message(
                subject_id,
                ChatMessage::assistant(format!(
                    "Generated {} files for {}",
                    subject.files.len(),
                    display_name(&analysis.suggested_name)
                ))
                .with_metadata(json!({
                    "stage": Stage::Ready.label(),
                    "fileCount": subject.files.len(),
                    "usedFallback": used_fallback,
                })),
            )
            .await?;

        self.emit_progress(subject_id, 100, Stage::Ready, "Generation complete");
        self.hub.publish(GenerationEvent::completed(subject.clone()));
        Ok(subject)
    }

    /// Terminal error handling: persist the error status (files untouched),
    /// append an error message and broadcast the failure. All writes are
    /// best effort; the broadcast always goes out.
    async fn fail_job(&self, subject_id: &str, cause: &PipelineError) {
        let message = cause.to_string();

        if let Err(e) = self
            .store
            .update_subject(subject_id, SubjectPatch::status(SubjectStatus::Error))
            .await
        {
            error!(subject_id, error = %e, "failed to persist error status");
        }
        if let Err(e) = self
            .store
            .append_message(
                subject_id,
                ChatMessage::assistant(format!("Generation failed: {}", message))
                    .with_metadata(json!({ "stage": Stage::Error.label(), "error": message })),
            )
            .await
        {
            error!(subject_id, error = %e, "failed to append error message");
        }

        self.hub.publish(GenerationEvent::failed(subject_id, message));
    }

    /// Run the optional preview deployment after a successful job.
    ///
    /// A deploy failure leaves the subject `Ready` with no preview URL.
    async fn deploy_preview(&self, subject: &Subject) {
        let Some(deployer) = &self.deployer else {
            return;
        };
        match deployer.deploy(subject).await {
            Ok(url) => {
                info!(subject_id = %subject.id, url = %url, "preview deployed");
                if let Err(e) = self
                    .store
                    .update_subject(&subject.id, SubjectPatch::default().with_preview_url(url))
                    .await
                {
                    warn!(subject_id = %subject.id, error = %e, "failed to persist preview url");
                }
            }
            Err(e) => {
                warn!(subject_id = %subject.id, error = %e, "preview deployment failed");
            }
        }
    }

    fn emit_stage(&self, subject_id: &str, stage: Stage, message: &str) {
        let percent = stage.checkpoint().unwrap_or(0);
        self.hub.publish(GenerationEvent::stage_changed(
            subject_id,
            &ProgressEvent::new(percent, stage.label(), message),
        ));
    }

    fn emit_progress(&self, subject_id: &str, percent: u8, stage: Stage, message: &str) {
        self.hub.publish(GenerationEvent::progress(
            subject_id,
            &ProgressEvent::new(percent, stage.label(), message),
        ));
    }
}

fn check_cancel(cancel: &CancelToken) -> PipelineResult<()> {
    if cancel.is_cancelled() {
        Err(PipelineError::Cancelled)
    } else {
        Ok(())
    }
}

fn display_name(suggested: &str) -> &str {
    let trimmed = suggested.trim();
    if trimmed.is_empty() {
        "the project"
    } else {
        trimmed
    }
}
