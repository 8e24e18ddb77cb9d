//! Generate command - submit a description and stream events until terminal.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

use forge_domain::GenerationEvent;
use forge_persistence::FsStore;
use forge_pipeline::GenerationPipeline;
use forge_providers::ProviderSelector;

#[derive(Args)]
pub struct GenerateArgs {
    /// Subject (project) identifier
    #[arg(short, long)]
    subject: String,

    /// Store directory for persisted subjects
    #[arg(long, default_value = ".forge")]
    store: PathBuf,

    /// Free-text project description
    #[arg(required = true, trailing_var_arg = true)]
    description: Vec<String>,
}

pub async fn execute(args: GenerateArgs) -> Result<()> {
    let prompt = args.description.join(" ");
    if prompt.trim().is_empty() {
        anyhow::bail!("A project description is required");
    }

    let selector = ProviderSelector::from_env();
    let store = Arc::new(FsStore::new(&args.store));
    let pipeline = GenerationPipeline::new(selector, store);

    // Subscribe before submitting: there is no replay for late joiners
    let mut rx = pipeline.subscribe(&args.subject);

    info!(subject = %args.subject, "submitting generation");
    if !pipeline.submit(&args.subject, &prompt) {
        anyhow::bail!("A generation is already running for subject {}", args.subject);
    }

    loop {
        match rx.recv().await {
            Ok(GenerationEvent::StageChanged {
                percent,
                stage,
                message,
                ..
            })
            | Ok(GenerationEvent::Progress {
                percent,
                stage,
                message,
                ..
            }) => {
                println!("[{:>3}%] {:<16} {}", percent, stage, message);
            }
            Ok(GenerationEvent::Completed { subject, .. }) => {
                println!("[100%] Ready            {} files generated", subject.files.len());
                for file in &subject.files {
                    println!("       - {}", file.path);
                }
                return Ok(());
            }
            Ok(GenerationEvent::Failed { error, .. }) => {
                anyhow::bail!("Generation failed: {}", error);
            }
            Err(RecvError::Lagged(skipped)) => {
                eprintln!("(skipped {} events)", skipped);
            }
            Err(RecvError::Closed) => {
                anyhow::bail!("Event stream closed before the job finished");
            }
        }
    }
}
