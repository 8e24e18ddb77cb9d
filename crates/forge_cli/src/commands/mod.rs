//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod generate;
pub mod show;

/// AppForge - provider-backed project generation
#[derive(Parser)]
#[command(name = "forge")]
#[command(version, about = "AppForge - provider-backed project generation")]
#[command(long_about = r#"
AppForge turns a free-text project description into a generated set of
source files, streaming live progress while the job runs.

WORKFLOWS:
  generate  → Submit a description and stream progress until the job ends
  show      → Print a subject's persisted files and message log

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Provider error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a project from a free-text description
    Generate(generate::GenerateArgs),

    /// Show a subject's persisted state
    Show(show::ShowArgs),
}
