//! Show command - print a subject's persisted state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use forge_persistence::{FsStore, SubjectStore};

#[derive(Args)]
pub struct ShowArgs {
    /// Subject (project) identifier
    #[arg(short, long)]
    subject: String,

    /// Store directory for persisted subjects
    #[arg(long, default_value = ".forge")]
    store: PathBuf,

    /// Also print the message log
    #[arg(long)]
    messages: bool,
}

pub async fn execute(args: ShowArgs) -> Result<()> {
    let store = FsStore::new(&args.store);

    let subject = store
        .get_subject(&args.subject)
        .await
        .with_context(|| format!("Failed to load subject {}", args.subject))?;

    println!("Subject:  {}", subject.id);
    println!("Status:   {:?}", subject.status);
    if let Some(url) = &subject.preview_url {
        println!("Preview:  {}", url);
    }
    println!("Updated:  {}", subject.updated_at.to_rfc3339());
    println!("Files ({}):", subject.files.len());
    for file in &subject.files {
        println!("  - {}", file.path);
    }

    if args.messages {
        let messages = store.messages(&args.subject).await?;
        println!("Messages ({}):", messages.len());
        for message in messages {
            println!("  [{:?}] {}", message.role, message.content);
        }
    }

    Ok(())
}
